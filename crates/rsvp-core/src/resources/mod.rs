//! Per-entity resources
//!
//! Thin instantiations of [`EntityResource`](crate::resource::EntityResource)
//! and [`ListResource`](crate::resource::ListResource), each owning the path
//! templates of its endpoints. The reply cache is the exception: it keeps one
//! list per comment.

mod comment;
mod invitation;
mod reply;
mod social;
mod tag;
mod user;

pub use comment::CommentList;
pub use invitation::{InvitationList, InvitationResource};
pub use reply::{ReplyCache, ReplyMap};
pub use social::{FollowingResource, ParticipationResource};
pub use tag::TagList;
pub use user::{InvitationTab, UserInvitationList, UserList, UserListKind, UserResource};
