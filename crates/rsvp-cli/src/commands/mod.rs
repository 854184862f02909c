//! Command handlers

pub mod auth;
pub mod comment;
pub mod config;
pub mod invitation;
pub mod reply;
pub mod tag;
pub mod theme;
pub mod user;

use anyhow::{anyhow, bail, Result};

use rsvp_core::error::ValidationErrors;
use rsvp_core::{PageOutcome, PageStatus};

use crate::output::Output;

/// Stop with the page's error unless it is ready
fn ensure_ready(status: PageStatus) -> Result<()> {
    match status.outcome() {
        PageOutcome::Ready => Ok(()),
        PageOutcome::Failed(e) => Err(e.into()),
        PageOutcome::Loading => bail!("Nothing was loaded"),
    }
}

/// Turn a write's outcome into a result, using the page error on failure
fn ensure_written(written: bool, status: PageStatus) -> Result<()> {
    if written {
        return Ok(());
    }
    match status.into_result() {
        Err(e) => Err(e.into()),
        Ok(()) => bail!("The request was not completed"),
    }
}

/// Apply a form submission result, printing field errors when invalid
fn submitted(
    result: std::result::Result<bool, ValidationErrors>,
    status: impl FnOnce() -> PageStatus,
    output: &Output,
) -> Result<()> {
    match result {
        Ok(written) => ensure_written(written, status()),
        Err(errors) => {
            output.print_validation(&errors);
            Err(anyhow!("Invalid input"))
        }
    }
}
