use tracing::warn;

use crate::aggregate::{PageStatus, Tracked};
use crate::error::{PageError, ValidationErrors};
use crate::models::{Invitation, InvitationInput, Tag, User};
use crate::resources::{InvitationResource, TagList};
use crate::transport::Transport;
use crate::validation::Validate;

/// The invitation form, for creating or editing
///
/// Editing is guarded: a viewer who is not the poster gets a permission
/// error in place of the form. Creating only requires a signed-in viewer.
pub struct InvitationEditPage {
    id: Option<u64>,
    viewer_id: Option<u64>,
    invitation: InvitationResource,
    tags: TagList,
}

impl InvitationEditPage {
    pub fn create(transport: Transport, viewer: Option<&User>) -> Self {
        Self::build(transport, None, viewer)
    }

    pub fn edit(transport: Transport, id: u64, viewer: Option<&User>) -> Self {
        Self::build(transport, Some(id), viewer)
    }

    fn build(transport: Transport, id: Option<u64>, viewer: Option<&User>) -> Self {
        Self {
            id,
            viewer_id: viewer.map(|u| u.id),
            invitation: InvitationResource::new(transport.clone()),
            tags: TagList::new(transport),
        }
    }

    /// Load the tag choices and, when editing, the invitation
    pub async fn load(&mut self) {
        match self.id {
            Some(id) => {
                tokio::join!(self.invitation.get(id), self.tags.get_all());
            }
            None => {
                self.tags.get_all().await;
            }
        }
    }

    pub fn invitation(&self) -> Option<&Invitation> {
        self.invitation.data()
    }

    pub fn tags(&self) -> &[Tag] {
        self.tags.items()
    }

    /// Form values: the loaded invitation's, when editing
    pub fn form(&self) -> Option<InvitationInput> {
        self.invitation.data().map(InvitationInput::from)
    }

    /// The local permission failure, if any
    ///
    /// When editing, ownership can only be checked once the invitation is
    /// loaded, so an unloaded invitation refuses too.
    pub fn guard(&self) -> Option<PageError> {
        self.check(true)
    }

    /// `require_loaded: false` lets a pending or failed load show as such
    fn check(&self, require_loaded: bool) -> Option<PageError> {
        let Some(viewer_id) = self.viewer_id else {
            return Some(PageError::permission(
                self.action(),
                "you need to sign in first",
            ));
        };
        if self.id.is_none() {
            return None;
        }
        match self.invitation.data() {
            None if require_loaded => Some(PageError::permission(
                self.action(),
                "it has not been loaded yet",
            )),
            None => None,
            Some(invitation) if !invitation.is_owned_by(viewer_id) => Some(
                PageError::permission(self.action(), "only its poster can change it"),
            ),
            Some(_) => None,
        }
    }

    fn action(&self) -> &'static str {
        if self.id.is_some() {
            "edit this invitation"
        } else {
            "post an invitation"
        }
    }

    /// Create or update; validation runs first and a failed guard sends nothing
    ///
    /// On success [`invitation`](Self::invitation) is the server's copy.
    pub async fn submit(&mut self, input: &InvitationInput) -> Result<bool, ValidationErrors> {
        input.validate()?;
        if let Some(guard) = self.guard() {
            warn!("Submit refused: {}", guard);
            return Ok(false);
        }
        let saved = match self.id {
            Some(id) => self.invitation.update(id, input).await,
            None => self.invitation.post(input).await,
        };
        if saved {
            self.id = self.invitation.data().map(|i| i.id).or(self.id);
        }
        Ok(saved)
    }

    /// Delete the edited invitation (poster only)
    pub async fn delete(&mut self) -> bool {
        let Some(id) = self.id else {
            return false;
        };
        if let Some(guard) = self.guard() {
            warn!("Delete refused: {}", guard);
            return false;
        }
        self.invitation.remove(id).await
    }

    pub fn status(&self) -> PageStatus {
        let status = if self.id.is_some() {
            PageStatus::of(&[&self.invitation as &dyn Tracked, &self.tags])
        } else {
            PageStatus::of(&[&self.tags])
        };
        status.with_guard(self.check(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::PageOutcome;
    use crate::error::ApiError;
    use crate::models::fixtures;
    use crate::transport::test_support::transport;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn viewer(id: u64) -> User {
        serde_json::from_value(fixtures::user(id, 0, false)).unwrap()
    }

    async fn mount_form_data(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/invitations/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": fixtures::invitation(3, 1) })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(
                vec![json!({"id": 1, "name": "games"})],
                1,
                1,
            )))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_non_owner_gets_permission_error() {
        let server = MockServer::start().await;
        mount_form_data(&server).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let stranger = viewer(2);
        let mut page = InvitationEditPage::edit(transport(&server.uri()), 3, Some(&stranger));
        page.load().await;

        assert!(matches!(
            page.status().outcome(),
            PageOutcome::Failed(PageError::Permission { .. })
        ));

        let input = page.form().unwrap();
        assert!(!page.submit(&input).await.unwrap());
    }

    #[tokio::test]
    async fn test_owner_updates() {
        let server = MockServer::start().await;
        mount_form_data(&server).await;
        let mut renamed = fixtures::invitation(3, 1);
        renamed["title"] = json!("Game night");
        Mock::given(method("PUT"))
            .and(path("/invitations/3"))
            .and(body_partial_json(json!({"title": "Game night", "tags": ["games"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": renamed })))
            .expect(1)
            .mount(&server)
            .await;

        let owner = viewer(1);
        let mut page = InvitationEditPage::edit(transport(&server.uri()), 3, Some(&owner));
        page.load().await;
        assert!(matches!(page.status().outcome(), PageOutcome::Ready));
        assert_eq!(page.tags().len(), 1);

        let mut input = page.form().unwrap();
        input.title = "Game night".to_string();
        assert!(page.submit(&input).await.unwrap());
        assert_eq!(page.invitation().map(|i| i.title.as_str()), Some("Game night"));
    }

    #[tokio::test]
    async fn test_invalid_input_reported_before_guard() {
        let server = MockServer::start().await;
        let mut page = InvitationEditPage::create(transport(&server.uri()), None);

        let input: InvitationInput = serde_json::from_value(json!({
            "title": "",
            "description": "",
            "startTime": "2026-11-01 18:00:00",
            "endTime": "2026-11-01 17:00:00",
            "capacity": 3,
            "tags": []
        }))
        .unwrap();
        let errors = page.submit(&input).await.unwrap_err();
        assert_eq!(errors.errors().len(), 2);
    }

    #[tokio::test]
    async fn test_create_requires_viewer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(vec![], 1, 1)))
            .mount(&server)
            .await;

        let mut page = InvitationEditPage::create(transport(&server.uri()), None);
        page.load().await;
        assert!(matches!(page.status().error(), Some(PageError::Permission { .. })));

        let poster = viewer(1);
        let mut page = InvitationEditPage::create(transport(&server.uri()), Some(&poster));
        page.load().await;
        assert!(matches!(page.status().outcome(), PageOutcome::Ready));
    }

    #[tokio::test]
    async fn test_unloaded_edit_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invitations/3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(vec![], 1, 1)))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let owner = viewer(1);
        let mut page = InvitationEditPage::edit(transport(&server.uri()), 3, Some(&owner));
        assert!(matches!(page.guard(), Some(PageError::Permission { .. })));
        assert!(matches!(page.status().outcome(), PageOutcome::Loading));
        assert!(!page.delete().await);

        page.load().await;
        // the failed load is what the page reports
        assert!(matches!(
            page.status().outcome(),
            PageOutcome::Failed(PageError::Api(ApiError::NotFound { .. }))
        ));
        let input: InvitationInput = serde_json::from_value(json!({
            "title": "Picnic",
            "description": "",
            "startTime": "2026-11-01 12:00:00",
            "endTime": "2026-11-01 15:00:00",
            "capacity": 10,
            "tags": []
        }))
        .unwrap();
        assert!(!page.submit(&input).await.unwrap());
        assert!(!page.delete().await);
    }

    #[tokio::test]
    async fn test_create_posts_and_keeps_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invitations"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": fixtures::invitation(12, 1) })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/invitations/12"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let poster = viewer(1);
        let mut page = InvitationEditPage::create(transport(&server.uri()), Some(&poster));
        let input: InvitationInput =
            serde_json::from_value(json!({
                "title": "Picnic",
                "description": "",
                "startTime": "2026-11-01 12:00:00",
                "endTime": "2026-11-01 15:00:00",
                "capacity": 10,
                "tags": ["outdoor"]
            }))
            .unwrap();
        assert!(page.submit(&input).await.unwrap());
        assert_eq!(page.invitation().map(|i| i.id), Some(12));

        assert!(page.delete().await);
        assert!(page.invitation().is_none());
    }
}
