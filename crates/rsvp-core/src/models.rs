//! Data models for RSVP
//!
//! Remote-owned entities (invitations, comments, replies, users, tags) and the
//! request bodies sent to create or change them. The client only ever holds
//! cached copies; the server is the source of truth.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Entities that can be matched by identifier
pub trait Identified {
    fn id(&self) -> u64;
}

/// Wire format for invitation start/end times
pub mod datetime_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A user as embedded in other entities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A tag attached to invitations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

/// An event listing a user can join
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "datetime_format")]
    pub start_time: NaiveDateTime,
    #[serde(with = "datetime_format")]
    pub end_time: NaiveDateTime,
    pub capacity: u32,
    #[serde(default)]
    pub participants: Vec<UserSummary>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// The poster
    pub user: UserSummary,
    /// Computed by the server: not full, not started, viewer not already in
    #[serde(default)]
    pub can_join: bool,
    #[serde(default)]
    pub comments_count: u32,
}

impl Invitation {
    /// Whether `user_id` posted this invitation
    pub fn is_owned_by(&self, user_id: u64) -> bool {
        self.user.id == user_id
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.capacity as usize
    }

    /// Whether `user_id` is among the participants
    pub fn has_participant(&self, user_id: u64) -> bool {
        self.participants.iter().any(|p| p.id == user_id)
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

/// A comment under an invitation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub invitation_id: u64,
    pub user: UserSummary,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub replies_count: u32,
}

/// A reply under a comment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: u64,
    pub comment_id: u64,
    pub user: UserSummary,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A user profile, with relationship flags relative to the viewer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub invitations_count: u32,
    #[serde(default)]
    pub participations_count: u32,
    #[serde(default)]
    pub followings_count: u32,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub is_follower: bool,
}

macro_rules! impl_identified {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn id(&self) -> u64 {
                self.id
            }
        })*
    };
}

impl_identified!(Invitation, Comment, Reply, User, UserSummary, Tag);

/// Pagination metadata returned with every list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(alias = "current_page")]
    pub current_page: u32,
    #[serde(alias = "last_page")]
    pub last_page: u32,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
        }
    }
}

impl PageMeta {
    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::default(),
        }
    }
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Single-entity response wrapper: `{"data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Response of the session check and login endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPayload {
    pub user: Option<User>,
}

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub id_token: String,
}

/// Body for creating or editing an invitation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvitationInput {
    pub title: String,
    pub description: String,
    #[serde(with = "datetime_format")]
    pub start_time: NaiveDateTime,
    #[serde(with = "datetime_format")]
    pub end_time: NaiveDateTime,
    pub capacity: u32,
    /// Tag names; the server creates unknown ones
    pub tags: Vec<String>,
}

impl From<&Invitation> for InvitationInput {
    fn from(invitation: &Invitation) -> Self {
        Self {
            title: invitation.title.clone(),
            description: invitation.description.clone(),
            start_time: invitation.start_time,
            end_time: invitation.end_time,
            capacity: invitation.capacity,
            tags: invitation.tags.iter().map(|t| t.name.clone()).collect(),
        }
    }
}

/// Body for creating or editing a comment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentInput {
    pub content: String,
}

/// Body for creating or editing a reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyInput {
    pub content: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn user_summary(id: u64) -> Value {
        json!({ "id": id, "name": format!("user{}", id) })
    }

    pub fn invitation(id: u64, poster: u64) -> Value {
        json!({
            "id": id,
            "title": format!("Invitation {}", id),
            "description": "Board games",
            "startTime": "2026-11-01 18:00:00",
            "endTime": "2026-11-01 21:00:00",
            "capacity": 4,
            "participants": [user_summary(poster)],
            "tags": [{ "id": 1, "name": "games" }],
            "user": user_summary(poster),
            "canJoin": true,
            "commentsCount": 0
        })
    }

    pub fn comment(id: u64, invitation_id: u64, replies: u32) -> Value {
        json!({
            "id": id,
            "invitationId": invitation_id,
            "user": user_summary(2),
            "content": format!("comment {}", id),
            "createdAt": "2026-10-01 12:00:00",
            "repliesCount": replies
        })
    }

    pub fn reply(id: u64, comment_id: u64) -> Value {
        json!({
            "id": id,
            "commentId": comment_id,
            "user": user_summary(3),
            "content": format!("reply {}", id)
        })
    }

    pub fn user(id: u64, followers: u32, is_following: bool) -> Value {
        json!({
            "id": id,
            "name": format!("user{}", id),
            "invitationsCount": 1,
            "participationsCount": 2,
            "followingsCount": 3,
            "followersCount": followers,
            "isFollowing": is_following,
            "isFollower": false
        })
    }

    pub fn page(items: Vec<Value>, current: u32, last: u32) -> Value {
        json!({ "data": items, "meta": { "currentPage": current, "lastPage": last } })
    }
}
