//! Invitation resources

use crate::aggregate::Tracked;
use crate::error::ApiError;
use crate::models::{Invitation, InvitationInput, Page};
use crate::query::SearchQuery;
use crate::resource::{EntityResource, ListResource, Placement};
use crate::transport::Transport;

const BASE: &str = "/invitations";

fn item_path(id: u64) -> String {
    format!("{}/{}", BASE, id)
}

/// One invitation, fetched by id
pub struct InvitationResource {
    inner: EntityResource<Invitation>,
}

impl InvitationResource {
    pub fn new(transport: Transport) -> Self {
        Self {
            inner: EntityResource::new(transport, "invitation"),
        }
    }

    pub fn data(&self) -> Option<&Invitation> {
        self.inner.data()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    pub async fn get(&mut self, id: u64) -> Option<Invitation> {
        self.inner.get(&item_path(id)).await
    }

    /// Refetch the cached invitation (after a child mutation)
    pub async fn refresh(&mut self) -> Option<Invitation> {
        let id = self.inner.data()?.id;
        self.get(id).await
    }

    pub async fn post(&mut self, input: &InvitationInput) -> bool {
        self.inner.post(BASE, input).await
    }

    pub async fn update(&mut self, id: u64, input: &InvitationInput) -> bool {
        self.inner.update(&item_path(id), input).await
    }

    pub async fn remove(&mut self, id: u64) -> bool {
        self.inner.remove(&item_path(id), id).await
    }
}

impl Tracked for InvitationResource {
    fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    fn is_resolved(&self) -> bool {
        self.inner.is_resolved()
    }
}

/// A page of invitation search results
pub struct InvitationList {
    inner: ListResource<Invitation>,
}

impl InvitationList {
    pub fn new(transport: Transport) -> Self {
        Self {
            inner: ListResource::new(transport, "invitation"),
        }
    }

    pub fn data(&self) -> Option<&Page<Invitation>> {
        self.inner.data()
    }

    pub fn items(&self) -> &[Invitation] {
        self.inner.items()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    pub async fn get_all(&mut self, query: &SearchQuery) -> Page<Invitation> {
        self.inner.get_all(&query.path_with(BASE)).await
    }

    /// Create from the list view; the new invitation goes first
    pub async fn post(&mut self, input: &InvitationInput) -> bool {
        self.inner.post(BASE, input, Placement::Prepend).await
    }

    pub async fn remove(&mut self, id: u64) -> bool {
        self.inner.remove(&item_path(id), id).await
    }
}

impl Tracked for InvitationList {
    fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    fn is_resolved(&self) -> bool {
        self.inner.is_resolved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use crate::transport::test_support::transport;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_all_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invitations"))
            .and(query_param("tags", "games,music"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(
                vec![fixtures::invitation(1, 1), fixtures::invitation(2, 1)],
                2,
                3,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let mut list = InvitationList::new(transport(&server.uri()));
        let query = SearchQuery {
            tags: vec!["games".to_string(), "music".to_string()],
            page: Some(2),
            ..SearchQuery::default()
        };
        let page = list.get_all(&query).await;
        assert_eq!(page.len(), 2);
        assert!(page.meta.has_next());
        assert_eq!(list.items().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_refetches_cached_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invitations/4"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": fixtures::invitation(4, 1)})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let mut res = InvitationResource::new(transport(&server.uri()));
        assert!(res.refresh().await.is_none());
        res.get(4).await;
        assert_eq!(res.refresh().await.map(|i| i.id), Some(4));
    }

    #[tokio::test]
    async fn test_update_replaces_data() {
        let server = MockServer::start().await;
        let mut updated = fixtures::invitation(4, 1);
        updated["title"] = json!("Renamed");
        Mock::given(method("PUT"))
            .and(path("/invitations/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": updated})))
            .mount(&server)
            .await;

        let mut res = InvitationResource::new(transport(&server.uri()));
        let invitation: Invitation = serde_json::from_value(fixtures::invitation(4, 1)).unwrap();
        assert!(res.update(4, &InvitationInput::from(&invitation)).await);
        assert_eq!(res.data().map(|i| i.title.as_str()), Some("Renamed"));
    }
}
