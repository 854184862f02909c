//! Tag command handlers

use anyhow::Result;

use rsvp_core::resources::TagList;
use rsvp_core::PageStatus;

use super::ensure_ready;
use crate::app::App;
use crate::output::Output;

/// List all tags
pub async fn list(app: &App, output: &Output) -> Result<()> {
    let mut tags = TagList::new(app.transport.clone());
    tags.get_all().await;
    ensure_ready(PageStatus::of(&[&tags]))?;
    output.print_tags(tags.items());
    Ok(())
}
