//! Generic cached resources
//!
//! A resource owns the last successfully fetched value and the last failure
//! for one entity type. Every operation follows the same rule:
//!
//! - success: the error is cleared and `data` reflects the server's answer
//! - failure: the error is stored and `data` is left exactly as it was
//!
//! Operations never return `Err` and never retry; callers look at the return
//! value (or `error()`) and decide. Per-entity wrappers in
//! [`crate::resources`] supply the paths.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::aggregate::Tracked;
use crate::error::ApiError;
use crate::models::{Envelope, Identified, Page};
use crate::transport::Transport;

/// Cached value plus the last failure
#[derive(Debug)]
pub struct Resource<T> {
    data: Option<T>,
    error: Option<ApiError>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub(crate) fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub(crate) fn replace(&mut self, value: T) {
        self.data = Some(value);
    }

    pub(crate) fn take(&mut self) -> Option<T> {
        self.data.take()
    }

    /// Record an operation outcome, returning the success value
    pub(crate) fn settle<R>(
        &mut self,
        entity: &str,
        op: &str,
        result: Result<R, ApiError>,
    ) -> Option<R> {
        match result {
            Ok(value) => {
                self.error = None;
                Some(value)
            }
            Err(e) => {
                warn!(entity, op, "Operation failed: {}", e);
                self.error = Some(e);
                None
            }
        }
    }
}

impl<T> Tracked for Resource<T> {
    fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    fn is_resolved(&self) -> bool {
        self.data.is_some()
    }
}

/// Where a newly created item goes in a loaded list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Prepend,
    Append,
    /// Leave the list alone (caller refetches)
    Ignore,
}

/// A single remote entity (one invitation, one user)
pub struct EntityResource<T> {
    transport: Transport,
    entity: &'static str,
    state: Resource<T>,
}

impl<T> EntityResource<T>
where
    T: DeserializeOwned + Identified + Clone,
{
    pub fn new(transport: Transport, entity: &'static str) -> Self {
        Self {
            transport,
            entity,
            state: Resource::new(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.state.error()
    }

    /// Fetch and replace; `None` on failure
    pub async fn get(&mut self, path: &str) -> Option<T> {
        let result = self.transport.get::<Envelope<T>>(path).await;
        let value = self.state.settle(self.entity, "get", result)?.data;
        debug!(entity = self.entity, id = value.id(), "Fetched");
        self.state.replace(value.clone());
        Some(value)
    }

    /// Create; `data` becomes the created entity
    pub async fn post<I: Serialize + ?Sized>(&mut self, path: &str, input: &I) -> bool {
        let result = self.transport.post::<Envelope<T>, I>(path, input).await;
        match self.state.settle(self.entity, "post", result) {
            Some(created) => {
                self.state.replace(created.data);
                true
            }
            None => false,
        }
    }

    /// Update; `data` becomes the server's updated entity
    pub async fn update<I: Serialize + ?Sized>(&mut self, path: &str, input: &I) -> bool {
        let result = self.transport.put::<Envelope<T>, I>(path, input).await;
        match self.state.settle(self.entity, "update", result) {
            Some(updated) => {
                self.state.replace(updated.data);
                true
            }
            None => false,
        }
    }

    /// Delete; clears `data` if it is the deleted entity
    pub async fn remove(&mut self, path: &str, id: u64) -> bool {
        let result = self.transport.delete::<Value>(path).await;
        if self.state.settle(self.entity, "remove", result).is_none() {
            return false;
        }
        if self.state.data().is_some_and(|d| d.id() == id) {
            self.state.take();
        }
        true
    }
}

impl<T> Tracked for EntityResource<T> {
    fn error(&self) -> Option<&ApiError> {
        self.state.error()
    }

    fn is_resolved(&self) -> bool {
        self.state.is_resolved()
    }
}

/// One page of a remote list (comments of an invitation, search results)
pub struct ListResource<T> {
    transport: Transport,
    entity: &'static str,
    state: Resource<Page<T>>,
}

impl<T> ListResource<T>
where
    T: DeserializeOwned + Identified + Clone,
{
    pub fn new(transport: Transport, entity: &'static str) -> Self {
        Self {
            transport,
            entity,
            state: Resource::new(),
        }
    }

    pub fn data(&self) -> Option<&Page<T>> {
        self.state.data()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.state.error()
    }

    /// Loaded items, empty if nothing loaded yet
    pub fn items(&self) -> &[T] {
        self.state.data().map(|p| p.data.as_slice()).unwrap_or(&[])
    }

    /// Fetch and replace; an empty page on failure
    pub async fn get_all(&mut self, path: &str) -> Page<T> {
        let result = self.transport.get::<Page<T>>(path).await;
        match self.state.settle(self.entity, "get_all", result) {
            Some(page) => {
                debug!(entity = self.entity, count = page.len(), "Fetched list");
                self.state.replace(page.clone());
                page
            }
            None => Page::default(),
        }
    }

    /// Create and place the created item in the loaded list
    pub async fn post<I: Serialize + ?Sized>(
        &mut self,
        path: &str,
        input: &I,
        placement: Placement,
    ) -> bool {
        let result = self.transport.post::<Envelope<T>, I>(path, input).await;
        let Some(created) = self.state.settle(self.entity, "post", result) else {
            return false;
        };
        if let Some(page) = self.state.data_mut() {
            match placement {
                Placement::Prepend => page.data.insert(0, created.data),
                Placement::Append => page.data.push(created.data),
                Placement::Ignore => {}
            }
        }
        true
    }

    /// Update and patch the matching item in place
    pub async fn update<I: Serialize + ?Sized>(&mut self, path: &str, id: u64, input: &I) -> bool {
        let result = self.transport.put::<Envelope<T>, I>(path, input).await;
        let Some(updated) = self.state.settle(self.entity, "update", result) else {
            return false;
        };
        if let Some(page) = self.state.data_mut() {
            if let Some(slot) = page.data.iter_mut().find(|item| item.id() == id) {
                *slot = updated.data;
            }
        }
        true
    }

    /// Change a loaded item without a request; false if it is not loaded
    pub fn patch(&mut self, id: u64, change: impl FnOnce(&mut T)) -> bool {
        let Some(page) = self.state.data_mut() else {
            return false;
        };
        match page.data.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                change(item);
                true
            }
            None => false,
        }
    }

    /// Delete and drop the matching item
    pub async fn remove(&mut self, path: &str, id: u64) -> bool {
        let result = self.transport.delete::<Value>(path).await;
        if self.state.settle(self.entity, "remove", result).is_none() {
            return false;
        }
        if let Some(page) = self.state.data_mut() {
            page.data.retain(|item| item.id() != id);
        }
        true
    }
}

impl<T> Tracked for ListResource<T> {
    fn error(&self) -> Option<&ApiError> {
        self.state.error()
    }

    fn is_resolved(&self) -> bool {
        self.state.is_resolved()
    }
}
