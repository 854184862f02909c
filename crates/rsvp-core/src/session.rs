//! Session and authentication
//!
//! The session starts `Unknown`, and becomes `Authenticated(user)` or
//! `Anonymous` once the startup check answers. Login is a three-step
//! handshake:
//!
//! 1. The external identity provider signs the user in and yields an ID token
//! 2. The token is exchanged with the backend for a cookie session
//! 3. The returned user becomes the local session
//!
//! If step 2 or 3 fails, the provider is signed out again so no half-open
//! external identity is left behind.
//!
//! The session is built once by the application root and passed by
//! reference to whatever needs it.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::{LoginInput, SessionPayload, User};
use crate::transport::Transport;

/// Token issued by the external identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdToken(pub String);

/// External sign-in flow
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the provider's sign-in flow
    async fn sign_in(&self) -> Result<IdToken, ApiError>;

    /// Drop the provider-side identity
    async fn sign_out(&self);
}

/// A pre-obtained token (flag or environment variable)
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn sign_in(&self) -> Result<IdToken, ApiError> {
        match self.token {
            Some(ref token) if !token.is_empty() => Ok(IdToken(token.clone())),
            _ => Err(ApiError::Unauthorized {
                message: "no identity token provided".to_string(),
            }),
        }
    }

    async fn sign_out(&self) {}
}

/// Who the client is acting as
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Startup check not answered yet
    Unknown,
    Authenticated(User),
    Anonymous,
}

/// The application's single session
pub struct Session<P> {
    transport: Transport,
    provider: P,
    state: SessionState,
    error: Option<ApiError>,
}

impl<P: IdentityProvider> Session<P> {
    pub fn new(transport: Transport, provider: P) -> Self {
        Self {
            transport,
            provider,
            state: SessionState::Unknown,
            error: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        match self.state {
            SessionState::Authenticated(ref user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Last auth error, cleared on navigation
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Ask the backend whether an existing session is still valid
    ///
    /// A `{"user": null}` answer also signs out, clearing any stale
    /// external identity.
    pub async fn bootstrap(&mut self) -> &SessionState {
        match self.transport.get::<SessionPayload>("/session").await {
            Ok(SessionPayload { user: Some(user) }) => {
                info!(user_id = user.id, "Existing session restored");
                self.error = None;
                self.state = SessionState::Authenticated(user);
            }
            Ok(SessionPayload { user: None }) => {
                info!("No existing session");
                self.logout().await;
            }
            Err(e) => {
                warn!("Session check failed: {}", e);
                self.error = Some(e);
                self.state = SessionState::Anonymous;
            }
        }
        &self.state
    }

    /// Sign in with the identity provider and open a backend session
    pub async fn login(&mut self) -> bool {
        let token = match self.provider.sign_in().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Identity provider sign-in failed: {}", e);
                self.error = Some(e);
                return false;
            }
        };

        match self.exchange(token).await {
            Ok(user) => {
                info!(user_id = user.id, "Signed in");
                self.error = None;
                self.state = SessionState::Authenticated(user);
                true
            }
            Err(e) => {
                warn!("Login failed, signing out of identity provider: {}", e);
                self.provider.sign_out().await;
                self.error = Some(e);
                false
            }
        }
    }

    async fn exchange(&self, token: IdToken) -> Result<User, ApiError> {
        self.transport.prime_csrf().await?;
        let input = LoginInput { id_token: token.0 };
        let payload: SessionPayload = self.transport.post("/login", &input).await?;
        payload.user.ok_or_else(|| ApiError::Unauthorized {
            message: "login returned no user".to_string(),
        })
    }

    /// End the backend session and the provider identity
    ///
    /// The local state becomes `Anonymous` even if the backend call fails.
    pub async fn logout(&mut self) {
        let result = self.transport.post::<Value, _>("/logout", &json!({})).await;
        match result {
            Ok(_) => self.error = None,
            Err(e) => {
                warn!("Logout call failed: {}", e);
                self.error = Some(e);
            }
        }
        self.provider.sign_out().await;
        if self.is_authenticated() {
            info!("Signed out");
        }
        self.state = SessionState::Anonymous;
    }

    /// Called on every page change: errors never outlive their page
    pub fn on_navigate(&mut self) {
        self.error = None;
    }
}
