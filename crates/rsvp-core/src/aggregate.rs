//! Page-level status aggregation
//!
//! A page composes several independent resources that resolve in any order.
//! Its status is recomputed from their current snapshots:
//!
//! - error: the first non-empty error by position wins
//! - loading: true while any snapshot is still absent
//!
//! An error always takes precedence over loading.

use crate::error::{ApiError, PageError};

/// Anything with a last error and a "has data" flag
pub trait Tracked {
    fn error(&self) -> Option<&ApiError>;

    /// Whether a value has been loaded at least once
    fn is_resolved(&self) -> bool;
}

/// First non-empty error, stable by position
pub fn first_error<'a, E: 'a>(errors: impl IntoIterator<Item = Option<&'a E>>) -> Option<&'a E> {
    errors.into_iter().flatten().next()
}

/// True iff any snapshot is still absent
pub fn any_unresolved<'a, T: 'a>(snapshots: impl IntoIterator<Item = Option<&'a T>>) -> bool {
    snapshots.into_iter().any(|s| s.is_none())
}

/// True iff any resolved flag is false
pub fn is_loading(resolved: impl IntoIterator<Item = bool>) -> bool {
    resolved.into_iter().any(|r| !r)
}

/// What a page should render
#[derive(Debug, Clone)]
pub enum PageOutcome {
    Loading,
    Failed(PageError),
    Ready,
}

/// Combined status of a page's resources and local guards
#[derive(Debug, Clone, Default)]
pub struct PageStatus {
    error: Option<PageError>,
    loading: bool,
}

impl PageStatus {
    /// Aggregate resources in display order
    pub fn of(resources: &[&dyn Tracked]) -> Self {
        let error = first_error(resources.iter().map(|r| r.error())).cloned();
        Self {
            error: error.map(PageError::Api),
            loading: is_loading(resources.iter().map(|r| r.is_resolved())),
        }
    }

    /// Add a local guard error; it only shows if nothing earlier failed
    pub fn with_guard(mut self, guard: Option<PageError>) -> Self {
        if self.error.is_none() {
            self.error = guard;
        }
        self
    }

    pub fn error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn outcome(&self) -> PageOutcome {
        match (&self.error, self.loading) {
            (Some(e), _) => PageOutcome::Failed(e.clone()),
            (None, true) => PageOutcome::Loading,
            (None, false) => PageOutcome::Ready,
        }
    }

    /// `Err` with the page error, for callers that stop on failure
    pub fn into_result(self) -> Result<(), PageError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
