//! Invitation command handlers

use anyhow::{bail, Result};
use chrono::NaiveDateTime;

use rsvp_core::pages::{InvitationDetailPage, InvitationEditPage, InvitationListPage};
use rsvp_core::query::parse_datetime;
use rsvp_core::{InvitationInput, SearchQuery};

use super::{ensure_ready, ensure_written, submitted};
use crate::app::App;
use crate::output::Output;
use crate::prompt::confirm;

/// Parse a command-line date-time (`YYYY-MM-DD HH:MM`)
pub fn parse_when(value: &str) -> std::result::Result<NaiveDateTime, String> {
    parse_datetime(value.trim())
        .ok_or_else(|| format!("Invalid date-time '{}', expected YYYY-MM-DD HH:MM", value))
}

/// Fields of the invitation form; unset fields keep their current value
#[derive(Debug, Default)]
pub struct InvitationFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub capacity: Option<u32>,
    pub tags: Option<Vec<String>>,
}

impl InvitationFields {
    fn apply(self, input: &mut InvitationInput) {
        if let Some(title) = self.title {
            input.title = title;
        }
        if let Some(description) = self.description {
            input.description = description;
        }
        if let Some(start) = self.start {
            input.start_time = start;
        }
        if let Some(end) = self.end {
            input.end_time = end;
        }
        if let Some(capacity) = self.capacity {
            input.capacity = capacity;
        }
        if let Some(tags) = self.tags {
            input.tags = tags;
        }
    }

    /// A new invitation; the start and end are required
    fn into_new(self) -> Result<InvitationInput> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            bail!("Both --start and --end are required");
        };
        let mut input = InvitationInput {
            title: String::new(),
            description: String::new(),
            start_time: start,
            end_time: end,
            capacity: 0,
            tags: Vec::new(),
        };
        self.apply(&mut input);
        Ok(input)
    }
}

/// Search invitations
pub async fn list(app: &App, query: SearchQuery, output: &Output) -> Result<()> {
    let mut page = InvitationListPage::new(app.transport.clone());
    if let Err(errors) = page.load(query).await {
        output.print_validation(&errors);
        bail!("Invalid search");
    }
    ensure_ready(page.status())?;
    output.print_invitations(page.invitations(), page.meta());
    Ok(())
}

/// Show an invitation with its comments; `replies` threads are expanded
pub async fn show(app: &App, id: u64, replies: Vec<u64>, output: &Output) -> Result<()> {
    let mut page = InvitationDetailPage::new(app.transport.clone(), id);
    page.load().await;
    for comment_id in replies {
        page.open_replies(comment_id).await;
    }
    ensure_ready(page.status())?;

    if let Some(invitation) = page.invitation() {
        output.print_invitation(invitation);
    }
    if !output.is_quiet() {
        output.print_comments(page.comments(), Some(page.threads()));
    }
    Ok(())
}

pub async fn create(app: &App, fields: InvitationFields, output: &Output) -> Result<()> {
    let input = fields.into_new()?;
    let mut page = InvitationEditPage::create(app.transport.clone(), app.viewer());
    ensure_allowed(&page)?;

    submitted(page.submit(&input).await, || page.status(), output)?;
    if let Some(invitation) = page.invitation() {
        output.success(&format!("Posted invitation {}", invitation.id));
        output.print_invitation(invitation);
    }
    Ok(())
}

pub async fn edit(app: &App, id: u64, fields: InvitationFields, output: &Output) -> Result<()> {
    let mut page = InvitationEditPage::edit(app.transport.clone(), id, app.viewer());
    page.load().await;
    ensure_ready(page.status())?;

    let Some(mut input) = page.form() else {
        bail!("Invitation not found: {}", id);
    };
    fields.apply(&mut input);

    submitted(page.submit(&input).await, || page.status(), output)?;
    output.success(&format!("Updated invitation {}", id));
    if let Some(invitation) = page.invitation() {
        output.print_invitation(invitation);
    }
    Ok(())
}

pub async fn delete(app: &App, id: u64, yes: bool, output: &Output) -> Result<()> {
    let mut page = InvitationEditPage::edit(app.transport.clone(), id, app.viewer());
    page.load().await;
    ensure_ready(page.status())?;

    if !yes && output.should_prompt() {
        let title = page.invitation().map(|i| i.title.clone()).unwrap_or_default();
        if !confirm(&format!("Delete invitation {} \"{}\"?", id, title))? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    let deleted = page.delete().await;
    ensure_written(deleted, page.status())?;
    output.success(&format!("Deleted invitation {}", id));
    Ok(())
}

pub async fn join(app: &App, id: u64, output: &Output) -> Result<()> {
    app.require_user()?;
    let mut page = InvitationDetailPage::new(app.transport.clone(), id);
    let joined = page.join().await;
    ensure_written(joined, page.status())?;

    output.success(&format!("Joined invitation {}", id));
    if let Some(invitation) = page.invitation() {
        output.print_invitation(invitation);
    }
    Ok(())
}

pub async fn leave(app: &App, id: u64, output: &Output) -> Result<()> {
    app.require_user()?;
    let mut page = InvitationDetailPage::new(app.transport.clone(), id);
    let left = page.leave().await;
    ensure_written(left, page.status())?;

    output.success(&format!("Left invitation {}", id));
    Ok(())
}

/// The create form has nothing to load but still refuses anonymous viewers
fn ensure_allowed(page: &InvitationEditPage) -> Result<()> {
    match page.guard() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_when() {
        let at = parse_when(" 2026-11-01 18:30 ").unwrap();
        assert_eq!(at.format("%H:%M").to_string(), "18:30");
        assert!(parse_when("tomorrow").is_err());
    }

    #[test]
    fn test_fields_override_form() {
        let mut input = InvitationFields {
            title: Some("Picnic".to_string()),
            start: parse_when("2026-11-01 12:00").ok(),
            end: parse_when("2026-11-01 15:00").ok(),
            ..InvitationFields::default()
        }
        .into_new()
        .unwrap();
        assert_eq!(input.title, "Picnic");
        assert_eq!(input.capacity, 0);

        InvitationFields {
            capacity: Some(12),
            tags: Some(vec!["outdoor".to_string()]),
            ..InvitationFields::default()
        }
        .apply(&mut input);
        assert_eq!(input.title, "Picnic");
        assert_eq!(input.capacity, 12);
        assert_eq!(input.tags, vec!["outdoor"]);
    }

    #[test]
    fn test_new_requires_times() {
        let fields = InvitationFields {
            title: Some("Picnic".to_string()),
            ..InvitationFields::default()
        };
        assert!(fields.into_new().is_err());
    }
}
