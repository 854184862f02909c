use std::fmt;
use std::str::FromStr;

use crate::aggregate::{PageStatus, Tracked};
use crate::error::{ApiError, PageError};
use crate::models::{Invitation, PageMeta, User};
use crate::resources::{
    FollowingResource, InvitationTab, UserInvitationList, UserList, UserListKind, UserResource,
};
use crate::transport::Transport;

/// The list shown under a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileTab {
    #[default]
    Posted,
    Participated,
    Followings,
    Followers,
}

impl fmt::Display for ProfileTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileTab::Posted => "posted",
            ProfileTab::Participated => "participated",
            ProfileTab::Followings => "followings",
            ProfileTab::Followers => "followers",
        };
        f.write_str(name)
    }
}

impl FromStr for ProfileTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "posted" => Ok(ProfileTab::Posted),
            "participated" => Ok(ProfileTab::Participated),
            "followings" | "following" => Ok(ProfileTab::Followings),
            "followers" => Ok(ProfileTab::Followers),
            other => Err(format!(
                "Unknown tab: {} (expected posted, participated, followings or followers)",
                other
            )),
        }
    }
}

enum TabList {
    Invitations(UserInvitationList),
    Users(UserList),
}

impl TabList {
    fn new(transport: Transport, tab: ProfileTab) -> Self {
        match tab {
            ProfileTab::Posted => {
                TabList::Invitations(UserInvitationList::new(transport, InvitationTab::Posted))
            }
            ProfileTab::Participated => TabList::Invitations(UserInvitationList::new(
                transport,
                InvitationTab::Participated,
            )),
            ProfileTab::Followings => TabList::Users(UserList::new(transport, UserListKind::Followings)),
            ProfileTab::Followers => TabList::Users(UserList::new(transport, UserListKind::Followers)),
        }
    }

    async fn load(&mut self, user_id: u64, query: &str) {
        match self {
            TabList::Invitations(list) => {
                list.get_all(user_id, query).await;
            }
            TabList::Users(list) => {
                list.get_all(user_id, query).await;
            }
        }
    }

    fn meta(&self) -> Option<PageMeta> {
        match self {
            TabList::Invitations(list) => list.data().map(|p| p.meta),
            TabList::Users(list) => list.data().map(|p| p.meta),
        }
    }
}

impl Tracked for TabList {
    fn error(&self) -> Option<&ApiError> {
        match self {
            TabList::Invitations(list) => list.error(),
            TabList::Users(list) => list.error(),
        }
    }

    fn is_resolved(&self) -> bool {
        match self {
            TabList::Invitations(list) => list.is_resolved(),
            TabList::Users(list) => list.is_resolved(),
        }
    }
}

/// A user's profile with one list tab and follow/unfollow
pub struct UserProfilePage {
    user_id: u64,
    viewer_id: Option<u64>,
    tab: ProfileTab,
    user: UserResource,
    list: TabList,
    following: FollowingResource,
    guard: Option<PageError>,
}

impl UserProfilePage {
    pub fn new(transport: Transport, user_id: u64, tab: ProfileTab, viewer: Option<&User>) -> Self {
        Self {
            user_id,
            viewer_id: viewer.map(|u| u.id),
            tab,
            user: UserResource::new(transport.clone()),
            list: TabList::new(transport.clone(), tab),
            following: FollowingResource::new(transport),
            guard: None,
        }
    }

    /// Fetch the profile and the tab's list concurrently
    pub async fn load(&mut self, query: &str) {
        let user_id = self.user_id;
        tokio::join!(self.user.get(user_id), self.list.load(user_id, query));
    }

    pub fn tab(&self) -> ProfileTab {
        self.tab
    }

    pub fn user(&self) -> Option<&User> {
        self.user.data()
    }

    /// Invitations of the posted/participated tabs
    pub fn invitations(&self) -> &[Invitation] {
        match self.list {
            TabList::Invitations(ref list) => list.items(),
            TabList::Users(_) => &[],
        }
    }

    /// Users of the followings/followers tabs
    pub fn users(&self) -> &[User] {
        match self.list {
            TabList::Users(ref list) => list.items(),
            TabList::Invitations(_) => &[],
        }
    }

    pub fn meta(&self) -> Option<PageMeta> {
        self.list.meta()
    }

    fn follow_guard(&self) -> Option<PageError> {
        match self.viewer_id {
            None => Some(PageError::permission("follow users", "you need to sign in first")),
            Some(id) if id == self.user_id => {
                Some(PageError::permission("follow users", "you cannot follow yourself"))
            }
            Some(_) => None,
        }
    }

    /// Follow, then refetch the user for its counts and flags
    pub async fn follow(&mut self) -> bool {
        self.guard = self.follow_guard();
        if self.guard.is_some() {
            return false;
        }
        if !self.following.post(self.user_id).await {
            return false;
        }
        self.user.get(self.user_id).await;
        true
    }

    pub async fn unfollow(&mut self) -> bool {
        self.guard = self.follow_guard();
        if self.guard.is_some() {
            return false;
        }
        if !self.following.remove(self.user_id).await {
            return false;
        }
        self.user.get(self.user_id).await;
        true
    }

    pub fn status(&self) -> PageStatus {
        PageStatus::of(&[&self.user as &dyn Tracked, &self.list, &self.following])
            .with_guard(self.guard.clone())
    }
}
