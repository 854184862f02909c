use std::collections::BTreeSet;

use tracing::debug;

use crate::aggregate::{PageStatus, Tracked};
use crate::error::{ApiError, ValidationErrors};
use crate::models::{Comment, CommentInput, Invitation, Reply, ReplyInput};
use crate::resources::{CommentList, InvitationResource, ParticipationResource, ReplyCache};
use crate::transport::Transport;
use crate::validation::Validate;

/// Which comments have their replies expanded, plus the cache behind them
///
/// Replies load on the first open. Posting a reply opens its thread, so the
/// poster sees the reply without expanding it again.
pub struct ReplyThreads {
    cache: ReplyCache,
    open: BTreeSet<u64>,
}

impl ReplyThreads {
    pub fn new(transport: Transport) -> Self {
        Self {
            cache: ReplyCache::new(transport),
            open: BTreeSet::new(),
        }
    }

    pub fn cache(&self) -> &ReplyCache {
        &self.cache
    }

    pub fn is_open(&self, comment_id: u64) -> bool {
        self.open.contains(&comment_id)
    }

    /// Expanded comment ids, ascending
    pub fn open_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.open.iter().copied()
    }

    /// Replies of an open thread
    pub fn replies(&self, comment_id: u64) -> Option<&[Reply]> {
        if self.is_open(comment_id) {
            self.cache.replies(comment_id)
        } else {
            None
        }
    }

    /// Expand a thread, fetching its replies the first time
    pub async fn open(&mut self, comment_id: u64) -> bool {
        self.open.insert(comment_id);
        self.cache.ensure_loaded(comment_id).await
    }

    pub fn close(&mut self, comment_id: u64) {
        self.open.remove(&comment_id);
    }

    /// Post under a comment; on success the thread is open with fresh replies
    pub async fn post_reply(
        &mut self,
        comment_id: u64,
        input: &ReplyInput,
    ) -> Result<bool, ValidationErrors> {
        input.validate()?;
        let posted = self.cache.post(input, comment_id).await;
        if posted {
            debug!(comment_id, "Reply posted, opening thread");
            self.open.insert(comment_id);
        }
        Ok(posted)
    }

    pub async fn update_reply(
        &mut self,
        comment_id: u64,
        reply_id: u64,
        input: &ReplyInput,
    ) -> Result<bool, ValidationErrors> {
        input.validate()?;
        Ok(self.cache.update(comment_id, reply_id, input).await)
    }

    pub async fn delete_reply(&mut self, comment_id: u64, reply_id: u64) -> bool {
        self.cache.remove(comment_id, reply_id).await
    }

    /// Drop a deleted comment's thread
    pub fn forget(&mut self, comment_id: u64) {
        self.open.remove(&comment_id);
        self.cache.invalidate(comment_id);
    }
}

impl Tracked for ReplyThreads {
    fn error(&self) -> Option<&ApiError> {
        self.cache.error()
    }

    fn is_resolved(&self) -> bool {
        self.cache.is_resolved()
    }
}

/// One invitation with its comments, reply threads and join/leave actions
pub struct InvitationDetailPage {
    id: u64,
    invitation: InvitationResource,
    comments: CommentList,
    threads: ReplyThreads,
    participation: ParticipationResource,
}

impl InvitationDetailPage {
    pub fn new(transport: Transport, id: u64) -> Self {
        Self {
            id,
            invitation: InvitationResource::new(transport.clone()),
            comments: CommentList::new(transport.clone()),
            threads: ReplyThreads::new(transport.clone()),
            participation: ParticipationResource::new(transport),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Fetch the invitation and its comments concurrently
    pub async fn load(&mut self) {
        let id = self.id;
        tokio::join!(self.invitation.get(id), self.comments.get_all(id, ""));
    }

    pub fn invitation(&self) -> Option<&Invitation> {
        self.invitation.data()
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.items()
    }

    pub fn threads(&self) -> &ReplyThreads {
        &self.threads
    }

    pub fn threads_mut(&mut self) -> &mut ReplyThreads {
        &mut self.threads
    }

    /// Join, then refetch the invitation for its participant list
    pub async fn join(&mut self) -> bool {
        if !self.participation.post(self.id).await {
            return false;
        }
        self.invitation.get(self.id).await;
        true
    }

    pub async fn leave(&mut self) -> bool {
        if !self.participation.remove(self.id).await {
            return false;
        }
        self.invitation.get(self.id).await;
        true
    }

    /// Post a comment; it goes to the top of the list and the
    /// invitation is refetched for its comment count
    pub async fn post_comment(&mut self, input: &CommentInput) -> Result<bool, ValidationErrors> {
        input.validate()?;
        if !self.comments.post(self.id, input).await {
            return Ok(false);
        }
        self.invitation.get(self.id).await;
        Ok(true)
    }

    pub async fn update_comment(
        &mut self,
        comment_id: u64,
        input: &CommentInput,
    ) -> Result<bool, ValidationErrors> {
        input.validate()?;
        Ok(self.comments.update(self.id, comment_id, input).await)
    }

    pub async fn delete_comment(&mut self, comment_id: u64) -> bool {
        if !self.comments.remove(self.id, comment_id).await {
            return false;
        }
        self.threads.forget(comment_id);
        self.invitation.get(self.id).await;
        true
    }

    pub async fn open_replies(&mut self, comment_id: u64) -> bool {
        self.threads.open(comment_id).await
    }

    pub fn close_replies(&mut self, comment_id: u64) {
        self.threads.close(comment_id);
    }

    /// Post a reply; the comment's reply count follows the refreshed thread
    pub async fn post_reply(
        &mut self,
        comment_id: u64,
        input: &ReplyInput,
    ) -> Result<bool, ValidationErrors> {
        let posted = self.threads.post_reply(comment_id, input).await?;
        if posted {
            self.sync_replies_count(comment_id, |n| n.saturating_add(1));
        }
        Ok(posted)
    }

    pub async fn update_reply(
        &mut self,
        comment_id: u64,
        reply_id: u64,
        input: &ReplyInput,
    ) -> Result<bool, ValidationErrors> {
        self.threads.update_reply(comment_id, reply_id, input).await
    }

    pub async fn delete_reply(&mut self, comment_id: u64, reply_id: u64) -> bool {
        let deleted = self.threads.delete_reply(comment_id, reply_id).await;
        if deleted {
            self.sync_replies_count(comment_id, |n| n.saturating_sub(1));
        }
        deleted
    }

    /// Patch the comment's `replies_count` from its cached thread, or step
    /// the old count with `fallback` when the thread is not loaded
    fn sync_replies_count(&mut self, comment_id: u64, fallback: fn(u32) -> u32) {
        let count = match self.threads.cache().replies(comment_id) {
            Some(replies) => u32::try_from(replies.len()).unwrap_or(u32::MAX),
            None => match self.comments.find(comment_id) {
                Some(comment) => fallback(comment.replies_count),
                None => return,
            },
        };
        debug!(comment_id, count, "Reply count patched");
        self.comments.set_replies_count(comment_id, count);
    }

    pub fn status(&self) -> PageStatus {
        PageStatus::of(&[
            &self.invitation,
            &self.comments,
            &self.threads,
            &self.participation,
        ])
    }
}
