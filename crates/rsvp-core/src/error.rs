//! Error types
//!
//! Three kinds of failure reach the user:
//!
//! - [`ApiError`]: a failed call to the REST API, one variant per status class
//! - [`ValidationErrors`]: field-level form errors, produced locally and never sent
//! - [`PageError::Permission`]: a page guard that failed locally (e.g. editing
//!   an invitation the viewer does not own)
//!
//! `ApiError` is `Clone` because resources keep the last failure as state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by the transport
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// 400
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// 401
    #[error("Not signed in: {message}")]
    Unauthorized { message: String },

    /// 403
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// 404
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// 419, the CSRF token was missing or stale
    #[error("Session expired (CSRF token mismatch): {message}")]
    CsrfMismatch { message: String },

    /// 500
    #[error("Server error: {message}")]
    ServerError { message: String },

    /// 502
    #[error("Bad gateway: {message}")]
    BadGateway { message: String },

    /// Any other non-2xx status
    #[error("Unexpected status {status}: {message}")]
    Unknown { status: u16, message: String },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),

    /// A 2xx response whose body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    /// The configured base URL and path did not form a URL
    #[error("Invalid request URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// Map a non-2xx status to its error kind
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => ApiError::BadRequest { message },
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            419 => ApiError::CsrfMismatch { message },
            500 => ApiError::ServerError { message },
            502 => ApiError::BadGateway { message },
            _ => ApiError::Unknown { status, message },
        }
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest { .. } => Some(400),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::CsrfMismatch { .. } => Some(419),
            ApiError::ServerError { .. } => Some(500),
            ApiError::BadGateway { .. } => Some(502),
            ApiError::Unknown { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::InvalidUrl(_) => None,
        }
    }

    /// Whether signing in again could fix this
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::CsrfMismatch { .. }
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Network(Arc::new(error))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(Arc::new(error))
    }
}

/// A single invalid form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All invalid fields of one form, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages for one field
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flattened view, ordered by field name
    pub fn errors(&self) -> Vec<FieldError> {
        self.fields
            .iter()
            .flat_map(|(&field, messages)| {
                messages.iter().map(move |message| FieldError {
                    field,
                    message: message.clone(),
                })
            })
            .collect()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors()
            .into_iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "Invalid input ({})", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// The single error a page displays in place of its content
#[derive(Error, Debug, Clone)]
pub enum PageError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A local guard refused the page
    #[error("Not allowed to {action}: {reason}")]
    Permission { action: String, reason: String },
}

impl PageError {
    pub fn permission(action: impl Into<String>, reason: impl Into<String>) -> Self {
        PageError::Permission {
            action: action.into(),
            reason: reason.into(),
        }
    }
}
