use crate::aggregate::PageStatus;
use crate::error::ValidationErrors;
use crate::models::{Invitation, Page, PageMeta};
use crate::query::SearchQuery;
use crate::resources::InvitationList;
use crate::transport::Transport;
use crate::validation::Validate;

/// Search results
pub struct InvitationListPage {
    invitations: InvitationList,
    query: SearchQuery,
}

impl InvitationListPage {
    pub fn new(transport: Transport) -> Self {
        Self {
            invitations: InvitationList::new(transport),
            query: SearchQuery::default(),
        }
    }

    /// Run a search; an invalid query is rejected before any request
    pub async fn load(&mut self, query: SearchQuery) -> Result<Page<Invitation>, ValidationErrors> {
        query.validate()?;
        let page = self.invitations.get_all(&query).await;
        self.query = query;
        Ok(page)
    }

    /// Same filters, following page; `None` on the last page
    ///
    /// A failed fetch keeps [`query`](Self::query) on the page still shown.
    pub async fn next_page(&mut self) -> Option<Page<Invitation>> {
        let meta = self.meta()?;
        if !meta.has_next() {
            return None;
        }
        let query = self.query.with_page(meta.current_page + 1);
        let page = self.invitations.get_all(&query).await;
        if self.invitations.error().is_none() {
            self.query = query;
        }
        Some(page)
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn invitations(&self) -> &[Invitation] {
        self.invitations.items()
    }

    pub fn meta(&self) -> Option<PageMeta> {
        self.invitations.data().map(|p| p.meta)
    }

    pub fn status(&self) -> PageStatus {
        PageStatus::of(&[&self.invitations])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::PageOutcome;
    use crate::models::fixtures;
    use crate::transport::test_support::transport;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_status_follows_resource() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invitations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(
                vec![fixtures::invitation(1, 1)],
                1,
                2,
            )))
            .mount(&server)
            .await;

        let mut page = InvitationListPage::new(transport(&server.uri()));
        assert!(matches!(page.status().outcome(), PageOutcome::Loading));

        page.load(SearchQuery::new()).await.unwrap();
        assert!(matches!(page.status().outcome(), PageOutcome::Ready));
        assert_eq!(page.invitations().len(), 1);
    }

    #[tokio::test]
    async fn test_next_page_keeps_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invitations"))
            .and(query_param("page", "2"))
            .and(query_param("title", "hike"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(
                vec![fixtures::invitation(5, 1)],
                2,
                2,
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/invitations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(
                vec![fixtures::invitation(4, 1)],
                1,
                2,
            )))
            .mount(&server)
            .await;

        let mut page = InvitationListPage::new(transport(&server.uri()));
        let query = SearchQuery {
            title: Some("hike".to_string()),
            ..SearchQuery::default()
        };
        page.load(query).await.unwrap();

        let second = page.next_page().await.unwrap();
        assert_eq!(second.data[0].id, 5);
        assert_eq!(page.query().page, Some(2));
        assert!(page.next_page().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_next_page_keeps_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invitations"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/invitations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(
                vec![fixtures::invitation(4, 1)],
                1,
                2,
            )))
            .mount(&server)
            .await;

        let mut page = InvitationListPage::new(transport(&server.uri()));
        page.load(SearchQuery::new()).await.unwrap();

        let failed = page.next_page().await.unwrap();
        assert!(failed.is_empty());
        assert_eq!(page.query().page, None);
        assert_eq!(page.invitations()[0].id, 4);
        assert_eq!(page.meta().map(|m| m.current_page), Some(1));
        assert!(page.status().error().is_some());
    }

    #[tokio::test]
    async fn test_invalid_query_never_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut page = InvitationListPage::new(transport(&server.uri()));
        let query = SearchQuery {
            min_capacity: Some(9),
            max_capacity: Some(1),
            ..SearchQuery::default()
        };
        assert!(page.load(query).await.is_err());
    }
}
