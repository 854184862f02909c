//! Participation and following edges
//!
//! Both are existence-only relationships: there is nothing to cache beyond
//! the outcome of the last call. The owning aggregate (the invitation, or the
//! followed user) carries the visible state, so callers refetch it after a
//! successful write.

use serde_json::{json, Value};

use crate::aggregate::Tracked;
use crate::error::ApiError;
use crate::resource::Resource;
use crate::transport::Transport;

/// Joining and leaving an invitation
pub struct ParticipationResource {
    transport: Transport,
    state: Resource<()>,
}

impl ParticipationResource {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            state: Resource::new(),
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.state.error()
    }

    fn path(invitation_id: u64) -> String {
        format!("/invitations/{}/participations", invitation_id)
    }

    pub async fn post(&mut self, invitation_id: u64) -> bool {
        let result = self
            .transport
            .post::<Value, _>(&Self::path(invitation_id), &json!({}))
            .await;
        self.state.settle("participation", "post", result).is_some()
    }

    pub async fn remove(&mut self, invitation_id: u64) -> bool {
        let result = self.transport.delete::<Value>(&Self::path(invitation_id)).await;
        self.state.settle("participation", "remove", result).is_some()
    }
}

/// Writes only; never holds a page back
impl Tracked for ParticipationResource {
    fn error(&self) -> Option<&ApiError> {
        self.state.error()
    }

    fn is_resolved(&self) -> bool {
        true
    }
}

/// Following and unfollowing a user
pub struct FollowingResource {
    transport: Transport,
    state: Resource<()>,
}

impl FollowingResource {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            state: Resource::new(),
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.state.error()
    }

    fn path(user_id: u64) -> String {
        format!("/users/{}/followings", user_id)
    }

    pub async fn post(&mut self, user_id: u64) -> bool {
        let result = self
            .transport
            .post::<Value, _>(&Self::path(user_id), &json!({}))
            .await;
        self.state.settle("following", "post", result).is_some()
    }

    pub async fn remove(&mut self, user_id: u64) -> bool {
        let result = self.transport.delete::<Value>(&Self::path(user_id)).await;
        self.state.settle("following", "remove", result).is_some()
    }
}

impl Tracked for FollowingResource {
    fn error(&self) -> Option<&ApiError> {
        self.state.error()
    }

    fn is_resolved(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_support::transport;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_join_then_leave() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invitations/8/participations"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/invitations/8/participations"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut participation = ParticipationResource::new(transport(&server.uri()));
        assert!(participation.post(8).await);
        assert!(participation.remove(8).await);
        assert!(participation.error().is_none());
    }

    #[tokio::test]
    async fn test_error_cleared_by_next_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/4/followings"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "cannot follow yourself"})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/users/4/followings"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let mut following = FollowingResource::new(transport(&server.uri()));
        assert!(!following.post(4).await);
        assert!(matches!(following.error(), Some(ApiError::BadRequest { .. })));

        assert!(following.remove(4).await);
        assert!(following.error().is_none());
    }
}
