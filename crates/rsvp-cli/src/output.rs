//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use rsvp_core::error::ValidationErrors;
use rsvp_core::pages::ReplyThreads;
use rsvp_core::{Comment, Invitation, PageMeta, Reply, Tag, User};

/// Display format for `startTime` / `endTime`
const WHEN: &str = "%Y-%m-%d %H:%M";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single invitation
    pub fn print_invitation(&self, invitation: &Invitation) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:           {}", invitation.id);
                println!("Title:        {}", invitation.title);
                if !invitation.description.is_empty() {
                    println!("Description:  {}", invitation.description);
                }
                println!(
                    "When:         {} → {}",
                    invitation.start_time.format(WHEN),
                    invitation.end_time.format(WHEN)
                );
                println!("Posted by:    {} (#{})", invitation.user.name, invitation.user.id);
                println!(
                    "Participants: {}/{}{}",
                    invitation.participants.len(),
                    invitation.capacity,
                    if invitation.is_full() { " (full)" } else { "" }
                );
                if !invitation.participants.is_empty() {
                    let names: Vec<&str> =
                        invitation.participants.iter().map(|p| p.name.as_str()).collect();
                    println!("              {}", names.join(", "));
                }
                if !invitation.tags.is_empty() {
                    println!("Tags:         {}", invitation.tag_names().join(", "));
                }
                println!("Can join:     {}", if invitation.can_join { "yes" } else { "no" });
            }
            OutputFormat::Json => print_json(invitation),
            OutputFormat::Quiet => println!("{}", invitation.id),
        }
    }

    /// Print a page of invitations
    pub fn print_invitations(&self, invitations: &[Invitation], meta: Option<PageMeta>) {
        match self.format {
            OutputFormat::Human => {
                if invitations.is_empty() {
                    println!("No invitations found.");
                    return;
                }
                for invitation in invitations {
                    println!(
                        "{:>5} | {} | {:>2}/{:<2} | {}",
                        invitation.id,
                        invitation.start_time.format(WHEN),
                        invitation.participants.len(),
                        invitation.capacity,
                        truncate(&invitation.title, 45)
                    );
                }
                match meta {
                    Some(meta) if meta.last_page > 1 => println!(
                        "\n{} invitation(s), page {} of {}",
                        invitations.len(),
                        meta.current_page,
                        meta.last_page
                    ),
                    _ => println!("\n{} invitation(s)", invitations.len()),
                }
            }
            OutputFormat::Json => print_json(invitations),
            OutputFormat::Quiet => {
                for invitation in invitations {
                    println!("{}", invitation.id);
                }
            }
        }
    }

    /// Print an invitation's comments, with the replies of open threads
    pub fn print_comments(&self, comments: &[Comment], threads: Option<&ReplyThreads>) {
        let replies_of = |id: u64| threads.and_then(|t| t.replies(id));
        match self.format {
            OutputFormat::Human => {
                println!("── Comments ({}) ──", comments.len());
                for comment in comments {
                    println!(
                        "[{}] {}: {}",
                        comment.id,
                        comment.user.name,
                        truncate_line(&comment.content, 70)
                    );
                    match replies_of(comment.id) {
                        Some(replies) => {
                            for reply in replies {
                                println!("    ↳ [{}] {}: {}", reply.id, reply.user.name, reply.content);
                            }
                        }
                        None if comment.replies_count > 0 => {
                            println!("    ({} repl{})", comment.replies_count, plural_y(comment.replies_count));
                        }
                        None => {}
                    }
                }
            }
            OutputFormat::Json => {
                let json: Vec<_> = comments
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "comment": c,
                            "replies": replies_of(c.id),
                        })
                    })
                    .collect();
                print_json(&json);
            }
            OutputFormat::Quiet => {
                for comment in comments {
                    println!("{}", comment.id);
                }
            }
        }
    }

    pub fn print_comment(&self, comment: &Comment) {
        match self.format {
            OutputFormat::Human => {
                println!("[{}] {}: {}", comment.id, comment.user.name, comment.content);
            }
            OutputFormat::Json => print_json(comment),
            OutputFormat::Quiet => println!("{}", comment.id),
        }
    }

    /// Print the replies under one comment
    pub fn print_replies(&self, replies: &[Reply]) {
        match self.format {
            OutputFormat::Human => {
                if replies.is_empty() {
                    println!("No replies.");
                    return;
                }
                for reply in replies {
                    let when = reply.created_at.as_deref().unwrap_or("");
                    println!("[{}] {} {}: {}", reply.id, when, reply.user.name, reply.content);
                }
                println!("\n{} repl{}", replies.len(), plural_y(replies.len() as u32));
            }
            OutputFormat::Json => print_json(replies),
            OutputFormat::Quiet => {
                for reply in replies {
                    println!("{}", reply.id);
                }
            }
        }
    }

    /// Print a user profile
    pub fn print_user(&self, user: &User) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:            {}", user.id);
                println!("Name:          {}", user.name);
                if let Some(ref email) = user.email {
                    println!("Email:         {}", email);
                }
                if let Some(ref description) = user.description {
                    println!("About:         {}", truncate_line(description, 60));
                }
                println!("Posted:        {}", user.invitations_count);
                println!("Participated:  {}", user.participations_count);
                println!("Following:     {}", user.followings_count);
                println!("Followers:     {}", user.followers_count);
                let mut relation = Vec::new();
                if user.is_following {
                    relation.push("you follow them");
                }
                if user.is_follower {
                    relation.push("they follow you");
                }
                if !relation.is_empty() {
                    println!("Relation:      {}", relation.join(", "));
                }
            }
            OutputFormat::Json => print_json(user),
            OutputFormat::Quiet => println!("{}", user.id),
        }
    }

    pub fn print_users(&self, users: &[User]) {
        match self.format {
            OutputFormat::Human => {
                if users.is_empty() {
                    println!("No users found.");
                    return;
                }
                for user in users {
                    println!("{:>5} | {}", user.id, user.name);
                }
                println!("\n{} user(s)", users.len());
            }
            OutputFormat::Json => print_json(users),
            OutputFormat::Quiet => {
                for user in users {
                    println!("{}", user.id);
                }
            }
        }
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &[Tag]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for tag in tags {
                    println!("{}", tag.name);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => print_json(tags),
            OutputFormat::Quiet => {
                for tag in tags {
                    println!("{}", tag.name);
                }
            }
        }
    }

    /// Print field errors to stderr, one line per message
    pub fn print_validation(&self, errors: &ValidationErrors) {
        match self.format {
            OutputFormat::Json => {
                let fields: Vec<_> = errors
                    .errors()
                    .into_iter()
                    .map(|e| serde_json::json!({"field": e.field, "message": e.message}))
                    .collect();
                eprintln!("{}", serde_json::json!({"status": "invalid", "errors": fields}));
            }
            OutputFormat::Human | OutputFormat::Quiet => {
                for error in errors.errors() {
                    eprintln!("  {}: {}", error.field, error.message);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode output: {}", e),
    }
}

fn plural_y(n: u32) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Friday night board games", 10), "Friday ...");
        assert_eq!(truncate("ééééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("see you there", 20), "see you there");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural_y(1), "y");
        assert_eq!(plural_y(2), "ies");
    }
}
