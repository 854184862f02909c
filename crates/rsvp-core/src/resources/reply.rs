//! Reply cache
//!
//! Replies are kept per parent comment in a map from comment id to that
//! comment's reply list. A key being present means "already fetched", even
//! when the list is empty; an absent key means "never fetched".
//!
//! The map is copy-on-write: every change swaps in a new top-level map in
//! which only the touched entry is new. Holders of an older
//! [`snapshot`](ReplyCache::snapshot) keep seeing the old state, and
//! `Arc::ptr_eq` tells whether anything changed.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::aggregate::Tracked;
use crate::error::ApiError;
use crate::models::{Envelope, Page, Reply, ReplyInput};
use crate::transport::Transport;

/// Comment id → loaded replies
pub type ReplyMap = HashMap<u64, Arc<Vec<Reply>>>;

fn list_path(comment_id: u64) -> String {
    format!("/comments/{}/replies", comment_id)
}

fn item_path(comment_id: u64, reply_id: u64) -> String {
    format!("/comments/{}/replies/{}", comment_id, reply_id)
}

/// Lazily loaded replies for every comment on a page
pub struct ReplyCache {
    transport: Transport,
    replies: Arc<ReplyMap>,
    error: Option<ApiError>,
}

impl ReplyCache {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            replies: Arc::new(HashMap::new()),
            error: None,
        }
    }

    /// Current map; cheap to clone and never mutated afterwards
    pub fn snapshot(&self) -> Arc<ReplyMap> {
        Arc::clone(&self.replies)
    }

    pub fn replies(&self, comment_id: u64) -> Option<&[Reply]> {
        self.replies.get(&comment_id).map(|list| list.as_slice())
    }

    pub fn is_loaded(&self, comment_id: u64) -> bool {
        self.replies.contains_key(&comment_id)
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Fetch and overwrite the entry for `comment_id`
    ///
    /// Returns an empty list on failure, leaving any cached entry in place.
    pub async fn get_all(&mut self, comment_id: u64) -> Arc<Vec<Reply>> {
        match self.transport.get::<Page<Reply>>(&list_path(comment_id)).await {
            Ok(page) => {
                self.error = None;
                debug!(comment_id, count = page.len(), "Fetched replies");
                self.write(comment_id, page.data)
            }
            Err(e) => {
                self.fail("get_all", e);
                Arc::new(Vec::new())
            }
        }
    }

    /// Fetch only if this comment's replies were never loaded
    ///
    /// Returns whether the entry is loaded afterwards.
    pub async fn ensure_loaded(&mut self, comment_id: u64) -> bool {
        if !self.is_loaded(comment_id) {
            self.get_all(comment_id).await;
        }
        self.is_loaded(comment_id)
    }

    /// Create a reply, then replace the entry with the server's list
    ///
    /// The list is refetched rather than appended to so ordering matches the
    /// server. Returns whether the reply was created.
    pub async fn post(&mut self, input: &ReplyInput, comment_id: u64) -> bool {
        let result = self
            .transport
            .post::<Value, _>(&list_path(comment_id), input)
            .await;
        if let Err(e) = result {
            self.fail("post", e);
            return false;
        }
        self.error = None;
        self.get_all(comment_id).await;
        true
    }

    /// Edit a reply and swap it into its comment's list
    pub async fn update(&mut self, comment_id: u64, reply_id: u64, input: &ReplyInput) -> bool {
        let result = self
            .transport
            .put::<Envelope<Reply>, _>(&item_path(comment_id, reply_id), input)
            .await;
        let updated = match result {
            Ok(envelope) => envelope.data,
            Err(e) => {
                self.fail("update", e);
                return false;
            }
        };
        self.error = None;

        if let Some(list) = self.replies.get(&comment_id) {
            let next: Vec<Reply> = list
                .iter()
                .map(|r| if r.id == reply_id { updated.clone() } else { r.clone() })
                .collect();
            self.write(comment_id, next);
        }
        true
    }

    /// Delete a reply and drop it from its comment's list
    pub async fn remove(&mut self, comment_id: u64, reply_id: u64) -> bool {
        let result = self
            .transport
            .delete::<Value>(&item_path(comment_id, reply_id))
            .await;
        if let Err(e) = result {
            self.fail("remove", e);
            return false;
        }
        self.error = None;

        if let Some(list) = self.replies.get(&comment_id) {
            let next: Vec<Reply> = list.iter().filter(|r| r.id != reply_id).cloned().collect();
            self.write(comment_id, next);
        }
        true
    }

    /// Forget a comment's replies so the next open refetches them
    pub fn invalidate(&mut self, comment_id: u64) {
        if self.is_loaded(comment_id) {
            let mut next = (*self.replies).clone();
            next.remove(&comment_id);
            self.replies = Arc::new(next);
        }
    }

    fn write(&mut self, comment_id: u64, list: Vec<Reply>) -> Arc<Vec<Reply>> {
        let list = Arc::new(list);
        let mut next = (*self.replies).clone();
        next.insert(comment_id, Arc::clone(&list));
        self.replies = Arc::new(next);
        list
    }

    fn fail(&mut self, op: &str, e: ApiError) {
        warn!(entity = "reply", op, "Operation failed: {}", e);
        self.error = Some(e);
    }
}

/// The cache never holds a page back; per-comment loading is local
impl Tracked for ReplyCache {
    fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    fn is_resolved(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use crate::transport::test_support::transport;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_replies(server: &MockServer, comment_id: u64, ids: &[u64], times: u64) {
        let items = ids.iter().map(|&id| fixtures::reply(id, comment_id)).collect();
        Mock::given(method("GET"))
            .and(path(format!("/comments/{}/replies", comment_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(items, 1, 1)))
            .expect(times)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_get_all_overwrites_entry() {
        let server = MockServer::start().await;
        mount_replies(&server, 1, &[100, 101], 2).await;

        let mut cache = ReplyCache::new(transport(&server.uri()));
        assert!(!cache.is_loaded(1));

        cache.get_all(1).await;
        let again = cache.get_all(1).await;
        assert_eq!(again.len(), 2);
        assert_eq!(cache.replies(1).map(|r| r.len()), Some(2));
    }

    #[tokio::test]
    async fn test_ensure_loaded_fetches_once_even_if_empty() {
        let server = MockServer::start().await;
        mount_replies(&server, 2, &[], 1).await;

        let mut cache = ReplyCache::new(transport(&server.uri()));
        assert!(cache.ensure_loaded(2).await);
        assert!(cache.ensure_loaded(2).await);
        assert_eq!(cache.replies(2), Some(&[][..]));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let server = MockServer::start().await;
        mount_replies(&server, 2, &[200], 2).await;

        let mut cache = ReplyCache::new(transport(&server.uri()));
        cache.ensure_loaded(2).await;
        cache.invalidate(2);
        assert!(!cache.is_loaded(2));
        cache.ensure_loaded(2).await;
    }

    #[tokio::test]
    async fn test_post_replaces_with_server_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/comments/1/replies"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"data": fixtures::reply(102, 1)})),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_replies(&server, 1, &[100, 101, 102], 1).await;

        let mut cache = ReplyCache::new(transport(&server.uri()));
        let input = ReplyInput {
            content: "me too".to_string(),
        };
        assert!(cache.post(&input, 1).await);

        let ids: Vec<u64> = cache.replies(1).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![100, 101, 102]);
    }

    #[tokio::test]
    async fn test_failed_post_keeps_entry() {
        let server = MockServer::start().await;
        mount_replies(&server, 1, &[100], 1).await;
        Mock::given(method("POST"))
            .and(path("/comments/1/replies"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut cache = ReplyCache::new(transport(&server.uri()));
        cache.get_all(1).await;
        let before = cache.snapshot();

        let input = ReplyInput {
            content: "hello".to_string(),
        };
        assert!(!cache.post(&input, 1).await);
        assert!(Arc::ptr_eq(&before, &cache.snapshot()));
        assert!(matches!(cache.error(), Some(ApiError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_update_and_remove_are_copy_on_write() {
        let server = MockServer::start().await;
        mount_replies(&server, 1, &[100, 101], 1).await;
        mount_replies(&server, 2, &[200], 1).await;

        let mut edited = fixtures::reply(101, 1);
        edited["content"] = json!("edited");
        Mock::given(method("PUT"))
            .and(path("/comments/1/replies/101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": edited})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/comments/1/replies/100"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let mut cache = ReplyCache::new(transport(&server.uri()));
        cache.get_all(1).await;
        cache.get_all(2).await;
        let before = cache.snapshot();

        let input = ReplyInput {
            content: "edited".to_string(),
        };
        assert!(cache.update(1, 101, &input).await);
        let after_update = cache.snapshot();
        assert!(!Arc::ptr_eq(&before, &after_update));
        // Untouched entries are shared, not copied
        assert!(Arc::ptr_eq(&before[&2], &after_update[&2]));
        assert_eq!(before[&1][1].content, "reply 101");
        assert_eq!(after_update[&1][1].content, "edited");

        assert!(cache.remove(1, 100).await);
        let ids: Vec<u64> = cache.replies(1).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![101]);
    }

    #[tokio::test]
    async fn test_failed_update_and_remove_keep_entry() {
        let server = MockServer::start().await;
        mount_replies(&server, 1, &[100, 101], 1).await;
        Mock::given(method("PUT"))
            .and(path("/comments/1/replies/101"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "not yours"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/comments/1/replies/100"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut cache = ReplyCache::new(transport(&server.uri()));
        cache.get_all(1).await;
        let before = cache.snapshot();

        let input = ReplyInput {
            content: "edited".to_string(),
        };
        assert!(!cache.update(1, 101, &input).await);
        assert!(Arc::ptr_eq(&before, &cache.snapshot()));
        assert_eq!(cache.replies(1).unwrap()[1].content, "reply 101");
        assert!(matches!(cache.error(), Some(ApiError::Forbidden { .. })));

        assert!(!cache.remove(1, 100).await);
        assert!(Arc::ptr_eq(&before, &cache.snapshot()));
        assert_eq!(cache.replies(1).map(|r| r.len()), Some(2));
        assert!(matches!(cache.error(), Some(ApiError::ServerError { .. })));
    }
}
