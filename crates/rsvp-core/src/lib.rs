//! RSVP Core Library
//!
//! Client-side state for an invitation platform: users post invitations,
//! join them, comment and reply under them, and follow each other. This
//! crate keeps the client's view of that data in sync with a REST backend.
//!
//! # Architecture
//!
//! - **Transport**: one JSON-over-HTTP client with a cookie session and a
//!   CSRF header mirrored from a cookie
//! - **Resources**: per-entity caches built on one generic resource, each
//!   holding its last loaded value and its last error
//! - **Pages**: compose resources, refetch after writes and reduce everything
//!   to a single error plus a single loading flag
//! - **Session**: the signed-in identity, built once and passed by reference
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let transport = Transport::new(&config)?;
//!
//! let mut session = Session::new(transport.clone(), StaticTokenProvider::new(token));
//! session.bootstrap().await;
//!
//! let mut page = InvitationDetailPage::new(transport, 42);
//! page.load().await;
//! match page.status().outcome() {
//!     PageOutcome::Ready => { /* render */ }
//!     PageOutcome::Failed(e) => eprintln!("{}", e),
//!     PageOutcome::Loading => {}
//! }
//! ```
//!
//! # Modules
//!
//! - `config`: Application configuration
//! - `transport`: HTTP calls, CSRF handling and cookie persistence
//! - `models`: Wire data structures
//! - `resource`: Generic entity and list resources
//! - `resources`: Per-entity resources and the reply cache
//! - `aggregate`: Page-level error/loading aggregation
//! - `session`: Authentication state
//! - `pages`: Page controllers
//! - `query`: Invitation search query strings
//! - `validation`: Form input rules
//! - `theme`: Persisted light/dark preference

pub mod aggregate;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod query;
pub mod resource;
pub mod resources;
pub mod session;
pub mod theme;
pub mod transport;
pub mod validation;

pub use aggregate::{PageOutcome, PageStatus, Tracked};
pub use config::Config;
pub use error::{ApiError, FieldError, PageError, ValidationErrors};
pub use models::{
    Comment, CommentInput, Invitation, InvitationInput, Page, PageMeta, Reply, ReplyInput, Tag,
    User, UserSummary,
};
pub use pages::{InvitationDetailPage, InvitationEditPage, InvitationListPage, ProfileTab, UserProfilePage};
pub use query::SearchQuery;
pub use session::{IdToken, IdentityProvider, Session, SessionState, StaticTokenProvider};
pub use theme::{Theme, ThemeStore};
pub use transport::{CookieFile, Transport};
pub use validation::Validate;
