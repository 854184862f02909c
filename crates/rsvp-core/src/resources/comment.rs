//! Comments under an invitation

use crate::aggregate::Tracked;
use crate::error::ApiError;
use crate::models::{Comment, CommentInput, Page};
use crate::resource::{ListResource, Placement};
use crate::transport::Transport;

fn list_path(invitation_id: u64) -> String {
    format!("/invitations/{}/comments", invitation_id)
}

fn item_path(invitation_id: u64, comment_id: u64) -> String {
    format!("/invitations/{}/comments/{}", invitation_id, comment_id)
}

/// The comment list of one invitation
///
/// Writes patch the loaded list by identifier: new comments are prepended,
/// edits replace the matching comment, deletes drop it.
pub struct CommentList {
    inner: ListResource<Comment>,
}

impl CommentList {
    pub fn new(transport: Transport) -> Self {
        Self {
            inner: ListResource::new(transport, "comment"),
        }
    }

    pub fn data(&self) -> Option<&Page<Comment>> {
        self.inner.data()
    }

    pub fn items(&self) -> &[Comment] {
        self.inner.items()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    /// Look up a loaded comment
    pub fn find(&self, comment_id: u64) -> Option<&Comment> {
        self.items().iter().find(|c| c.id == comment_id)
    }

    /// Fetch one page; `query` is appended verbatim when non-empty
    pub async fn get_all(&mut self, invitation_id: u64, query: &str) -> Page<Comment> {
        let path = if query.is_empty() {
            list_path(invitation_id)
        } else {
            format!("{}?{}", list_path(invitation_id), query)
        };
        self.inner.get_all(&path).await
    }

    pub async fn post(&mut self, invitation_id: u64, input: &CommentInput) -> bool {
        self.inner
            .post(&list_path(invitation_id), input, Placement::Prepend)
            .await
    }

    pub async fn update(&mut self, invitation_id: u64, comment_id: u64, input: &CommentInput) -> bool {
        self.inner
            .update(&item_path(invitation_id, comment_id), comment_id, input)
            .await
    }

    /// Set a loaded comment's reply count after its replies changed
    pub fn set_replies_count(&mut self, comment_id: u64, count: u32) -> bool {
        self.inner.patch(comment_id, |c| c.replies_count = count)
    }

    pub async fn remove(&mut self, invitation_id: u64, comment_id: u64) -> bool {
        self.inner
            .remove(&item_path(invitation_id, comment_id), comment_id)
            .await
    }
}

impl Tracked for CommentList {
    fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    fn is_resolved(&self) -> bool {
        self.inner.is_resolved()
    }
}
