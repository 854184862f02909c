//! Users and their lists

use std::fmt;
use std::str::FromStr;

use crate::aggregate::Tracked;
use crate::error::ApiError;
use crate::models::{Invitation, Page, User};
use crate::resource::{EntityResource, ListResource};
use crate::transport::Transport;

fn user_path(user_id: u64) -> String {
    format!("/users/{}", user_id)
}

/// One user profile
pub struct UserResource {
    inner: EntityResource<User>,
}

impl UserResource {
    pub fn new(transport: Transport) -> Self {
        Self {
            inner: EntityResource::new(transport, "user"),
        }
    }

    pub fn data(&self) -> Option<&User> {
        self.inner.data()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    pub async fn get(&mut self, user_id: u64) -> Option<User> {
        self.inner.get(&user_path(user_id)).await
    }
}

impl Tracked for UserResource {
    fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    fn is_resolved(&self) -> bool {
        self.inner.is_resolved()
    }
}

/// Which invitations of a user to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationTab {
    /// Invitations the user posted
    Posted,
    /// Invitations the user joined
    Participated,
}

impl InvitationTab {
    fn segment(self) -> &'static str {
        match self {
            InvitationTab::Posted => "invitations",
            InvitationTab::Participated => "participations",
        }
    }
}

/// A page of a user's posted or joined invitations
pub struct UserInvitationList {
    tab: InvitationTab,
    inner: ListResource<Invitation>,
}

impl UserInvitationList {
    pub fn new(transport: Transport, tab: InvitationTab) -> Self {
        Self {
            tab,
            inner: ListResource::new(transport, "invitation"),
        }
    }

    pub fn items(&self) -> &[Invitation] {
        self.inner.items()
    }

    pub fn data(&self) -> Option<&Page<Invitation>> {
        self.inner.data()
    }

    pub async fn get_all(&mut self, user_id: u64, query: &str) -> Page<Invitation> {
        let path = with_query(format!("{}/{}", user_path(user_id), self.tab.segment()), query);
        self.inner.get_all(&path).await
    }
}

impl Tracked for UserInvitationList {
    fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    fn is_resolved(&self) -> bool {
        self.inner.is_resolved()
    }
}

/// Which users related to a user to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserListKind {
    /// Users this user follows
    Followings,
    /// Users following this user
    Followers,
}

impl UserListKind {
    fn segment(self) -> &'static str {
        match self {
            UserListKind::Followings => "followings",
            UserListKind::Followers => "followers",
        }
    }
}

/// A page of a user's followings or followers
pub struct UserList {
    kind: UserListKind,
    inner: ListResource<User>,
}

impl UserList {
    pub fn new(transport: Transport, kind: UserListKind) -> Self {
        Self {
            kind,
            inner: ListResource::new(transport, "user"),
        }
    }

    pub fn items(&self) -> &[User] {
        self.inner.items()
    }

    pub fn data(&self) -> Option<&Page<User>> {
        self.inner.data()
    }

    pub async fn get_all(&mut self, user_id: u64, query: &str) -> Page<User> {
        let path = with_query(format!("{}/{}", user_path(user_id), self.kind.segment()), query);
        self.inner.get_all(&path).await
    }
}

impl Tracked for UserList {
    fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    fn is_resolved(&self) -> bool {
        self.inner.is_resolved()
    }
}

fn with_query(path: String, query: &str) -> String {
    if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    }
}

impl fmt::Display for InvitationTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvitationTab::Posted => write!(f, "posted"),
            InvitationTab::Participated => write!(f, "participated"),
        }
    }
}

impl FromStr for InvitationTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posted" => Ok(InvitationTab::Posted),
            "participated" => Ok(InvitationTab::Participated),
            other => Err(format!("unknown invitation tab '{}'", other)),
        }
    }
}
