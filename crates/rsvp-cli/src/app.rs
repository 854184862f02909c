//! Per-invocation application state
//!
//! Built once in `main` and handed to the command handlers: the loaded
//! configuration, the shared transport, and the bootstrapped session.

use anyhow::{bail, Context, Result};
use tracing::warn;

use rsvp_core::{Config, CookieFile, Session, StaticTokenProvider, Transport, User};

pub struct App {
    pub config: Config,
    pub transport: Transport,
    pub session: Session<StaticTokenProvider>,
    cookies: CookieFile,
    persist_cookies: bool,
}

impl App {
    /// Restore saved cookies and check the existing session
    pub async fn start(config: Config, token: Option<String>) -> Result<Self> {
        let transport = Transport::new(&config).context("Failed to create HTTP client")?;
        let cookies = CookieFile::new(config.cookie_path());
        let base = transport.url("/")?;
        if let Err(e) = cookies.restore(transport.jar(), &base) {
            warn!("Ignoring saved cookies: {:#}", e);
        }

        let mut session = Session::new(transport.clone(), StaticTokenProvider::new(token));
        session.bootstrap().await;

        Ok(Self {
            config,
            transport,
            session,
            cookies,
            persist_cookies: true,
        })
    }

    /// Start of a command's page: earlier errors are dropped
    pub fn navigate(&mut self) {
        self.session.on_navigate();
    }

    pub fn viewer(&self) -> Option<&User> {
        self.session.current_user()
    }

    /// The signed-in user, or a hint to log in
    pub fn require_user(&self) -> Result<&User> {
        match self.session.current_user() {
            Some(user) => Ok(user),
            None => bail!("Not signed in. Run `rsvp login` first."),
        }
    }

    /// Sign out and stop persisting the cookie jar
    pub async fn logout(&mut self) -> Result<()> {
        self.session.logout().await;
        self.persist_cookies = false;
        self.cookies.clear()
    }

    /// Save the cookie jar for the next run
    pub fn finish(&self) -> Result<()> {
        if !self.persist_cookies {
            return Ok(());
        }
        let base = self.transport.url("/")?;
        self.cookies.save(self.transport.jar(), &base)
    }
}
