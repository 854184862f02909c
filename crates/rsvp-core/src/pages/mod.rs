//! Page controllers
//!
//! A page owns the resources it displays, loads them, performs writes, and
//! refetches the parent aggregate after a child write. Its
//! [`status`](crate::aggregate::PageStatus) combines every resource into one
//! error and one loading flag.
//!
//! Writes that take form input validate it first and return the
//! [`ValidationErrors`](crate::error::ValidationErrors) without sending
//! anything.

mod invitation_detail;
mod invitation_edit;
mod invitation_list;
mod user_profile;

pub use invitation_detail::{InvitationDetailPage, ReplyThreads};
pub use invitation_edit::InvitationEditPage;
pub use invitation_list::InvitationListPage;
pub use user_profile::{ProfileTab, UserProfilePage};
