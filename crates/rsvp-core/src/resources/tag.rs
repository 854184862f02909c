//! Tags

use crate::aggregate::Tracked;
use crate::error::ApiError;
use crate::models::{Page, Tag};
use crate::resource::ListResource;
use crate::transport::Transport;

/// All tags, for the search and invitation forms
pub struct TagList {
    inner: ListResource<Tag>,
}

impl TagList {
    pub fn new(transport: Transport) -> Self {
        Self {
            inner: ListResource::new(transport, "tag"),
        }
    }

    pub fn items(&self) -> &[Tag] {
        self.inner.items()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    pub async fn get_all(&mut self) -> Page<Tag> {
        self.inner.get_all("/tags").await
    }

    /// Names of the loaded tags
    pub fn names(&self) -> Vec<&str> {
        self.items().iter().map(|t| t.name.as_str()).collect()
    }
}

impl Tracked for TagList {
    fn error(&self) -> Option<&ApiError> {
        self.inner.error()
    }

    fn is_resolved(&self) -> bool {
        self.inner.is_resolved()
    }
}
