//! Reply command handlers

use anyhow::Result;

use rsvp_core::pages::ReplyThreads;
use rsvp_core::{PageStatus, ReplyInput};

use super::{ensure_ready, ensure_written, submitted};
use crate::app::App;
use crate::output::Output;

fn status(threads: &ReplyThreads) -> PageStatus {
    PageStatus::of(&[threads])
}

fn print_thread(threads: &ReplyThreads, comment_id: u64, output: &Output) {
    output.print_replies(threads.replies(comment_id).unwrap_or(&[]));
}

pub async fn list(app: &App, comment_id: u64, output: &Output) -> Result<()> {
    let mut threads = ReplyThreads::new(app.transport.clone());
    threads.open(comment_id).await;
    ensure_ready(status(&threads))?;
    print_thread(&threads, comment_id, output);
    Ok(())
}

/// Post a reply and show the comment's refreshed thread
pub async fn add(app: &App, comment_id: u64, content: String, output: &Output) -> Result<()> {
    app.require_user()?;
    let mut threads = ReplyThreads::new(app.transport.clone());
    let input = ReplyInput { content };
    submitted(threads.post_reply(comment_id, &input).await, || status(&threads), output)?;

    output.success(&format!("Replied to comment {}", comment_id));
    print_thread(&threads, comment_id, output);
    Ok(())
}

pub async fn edit(
    app: &App,
    comment_id: u64,
    reply_id: u64,
    content: String,
    output: &Output,
) -> Result<()> {
    app.require_user()?;
    let mut threads = ReplyThreads::new(app.transport.clone());
    threads.open(comment_id).await;
    ensure_ready(status(&threads))?;

    let input = ReplyInput { content };
    submitted(
        threads.update_reply(comment_id, reply_id, &input).await,
        || status(&threads),
        output,
    )?;

    output.success(&format!("Updated reply {}", reply_id));
    print_thread(&threads, comment_id, output);
    Ok(())
}

pub async fn delete(app: &App, comment_id: u64, reply_id: u64, output: &Output) -> Result<()> {
    app.require_user()?;
    let mut threads = ReplyThreads::new(app.transport.clone());
    let deleted = threads.delete_reply(comment_id, reply_id).await;
    ensure_written(deleted, status(&threads))?;

    output.success(&format!("Deleted reply {}", reply_id));
    Ok(())
}
