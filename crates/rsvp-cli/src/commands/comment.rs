//! Comment command handlers

use anyhow::Result;

use rsvp_core::pages::InvitationDetailPage;
use rsvp_core::CommentInput;

use super::{ensure_ready, ensure_written, submitted};
use crate::app::App;
use crate::output::Output;

pub async fn add(app: &App, invitation_id: u64, content: String, output: &Output) -> Result<()> {
    app.require_user()?;
    let mut page = InvitationDetailPage::new(app.transport.clone(), invitation_id);
    page.load().await;
    ensure_ready(page.status())?;

    let input = CommentInput { content };
    submitted(page.post_comment(&input).await, || page.status(), output)?;

    if let Some(comment) = page.comments().first() {
        output.success(&format!("Posted comment {}", comment.id));
        output.print_comment(comment);
    }
    Ok(())
}

pub async fn edit(
    app: &App,
    invitation_id: u64,
    comment_id: u64,
    content: String,
    output: &Output,
) -> Result<()> {
    app.require_user()?;
    let mut page = InvitationDetailPage::new(app.transport.clone(), invitation_id);
    page.load().await;
    ensure_ready(page.status())?;

    let input = CommentInput { content };
    submitted(page.update_comment(comment_id, &input).await, || page.status(), output)?;

    output.success(&format!("Updated comment {}", comment_id));
    if let Some(comment) = page.comments().iter().find(|c| c.id == comment_id) {
        output.print_comment(comment);
    }
    Ok(())
}

pub async fn delete(app: &App, invitation_id: u64, comment_id: u64, output: &Output) -> Result<()> {
    app.require_user()?;
    let mut page = InvitationDetailPage::new(app.transport.clone(), invitation_id);
    let deleted = page.delete_comment(comment_id).await;
    ensure_written(deleted, page.status())?;

    output.success(&format!("Deleted comment {}", comment_id));
    Ok(())
}
