//! RSVP CLI
//!
//! Command-line interface for RSVP - browse, post and join invitations.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rsvp_core::{Config, ProfileTab, SearchQuery, Theme};

mod app;
mod commands;
mod output;
mod prompt;

use app::App;
use commands::invitation::{parse_when, InvitationFields};
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "rsvp")]
#[command(about = "RSVP - Find, post and join invitations")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with an identity token
    Login {
        /// ID token from the identity provider
        #[arg(long, env = "RSVP_ID_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse and manage invitations
    #[command(alias = "inv")]
    Invitations {
        #[command(subcommand)]
        command: InvitationCommands,
    },
    /// Join an invitation
    Join { id: u64 },
    /// Leave an invitation
    Leave { id: u64 },
    /// Manage comments on an invitation
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },
    /// Manage replies to a comment
    Reply {
        #[command(subcommand)]
        command: ReplyCommands,
    },
    /// Show user profiles
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Follow a user
    Follow { id: u64 },
    /// Stop following a user
    Unfollow { id: u64 },
    /// List all tags
    Tags,
    /// Show or change the light/dark theme
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(clap::Args)]
struct FieldArgs {
    /// Title
    #[arg(short = 'T', long)]
    title: Option<String>,
    /// Description
    #[arg(short, long)]
    description: Option<String>,
    /// Start, as "YYYY-MM-DD HH:MM"
    #[arg(long, value_parser = parse_when)]
    start: Option<NaiveDateTime>,
    /// End, as "YYYY-MM-DD HH:MM"
    #[arg(long, value_parser = parse_when)]
    end: Option<NaiveDateTime>,
    /// Maximum number of participants
    #[arg(short, long)]
    capacity: Option<u32>,
    /// Tags (repeatable); replaces the current tags when editing
    #[arg(short, long)]
    tag: Vec<String>,
}

impl From<FieldArgs> for InvitationFields {
    fn from(args: FieldArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            start: args.start,
            end: args.end,
            capacity: args.capacity,
            tags: (!args.tag.is_empty()).then_some(args.tag),
        }
    }
}

#[derive(Subcommand)]
enum InvitationCommands {
    /// Search invitations
    #[command(alias = "ls")]
    List {
        /// Title contains
        #[arg(long)]
        title: Option<String>,
        /// Has tag (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,
        /// Starts after "YYYY-MM-DD HH:MM"
        #[arg(long, value_parser = parse_when)]
        after: Option<NaiveDateTime>,
        /// Starts before "YYYY-MM-DD HH:MM"
        #[arg(long, value_parser = parse_when)]
        before: Option<NaiveDateTime>,
        /// Minimum capacity
        #[arg(long)]
        min: Option<u32>,
        /// Maximum capacity
        #[arg(long)]
        max: Option<u32>,
        /// Result page
        #[arg(long)]
        page: Option<u32>,
    },
    /// Show an invitation with its comments
    Show {
        id: u64,
        /// Expand the replies of this comment (repeatable)
        #[arg(short, long = "replies")]
        replies: Vec<u64>,
    },
    /// Post a new invitation
    #[command(alias = "add")]
    Create {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit an invitation you posted
    Edit {
        id: u64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an invitation you posted
    #[command(alias = "rm")]
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CommentCommands {
    /// Comment on an invitation
    Add { invitation: u64, content: String },
    /// Edit a comment
    Edit {
        invitation: u64,
        id: u64,
        content: String,
    },
    /// Delete a comment
    #[command(alias = "rm")]
    Delete { invitation: u64, id: u64 },
}

#[derive(Subcommand)]
enum ReplyCommands {
    /// List the replies to a comment
    #[command(alias = "ls")]
    List { comment: u64 },
    /// Reply to a comment
    Add { comment: u64, content: String },
    /// Edit a reply
    Edit {
        comment: u64,
        id: u64,
        content: String,
    },
    /// Delete a reply
    #[command(alias = "rm")]
    Delete { comment: u64, id: u64 },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Show a profile
    Show {
        id: u64,
        /// posted, participated, followings or followers
        #[arg(long, default_value = "posted")]
        tab: ProfileTab,
        /// List page
        #[arg(long)]
        page: Option<u32>,
    },
}

#[derive(Subcommand, Clone)]
enum ThemeCommands {
    /// Show the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme
    Set { theme: Theme },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, data_dir, csrf_cookie, csrf_header, csrf_prime_path, request_timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Local-only commands never talk to the API
    match &cli.command {
        Commands::Config { command } => {
            return handle_config_command(command.clone(), config_path, &output);
        }
        Commands::Theme { command } => {
            return handle_theme_command(command.clone(), config_path, &output);
        }
        _ => {}
    }

    let config = Config::load_with_cli_override(config_path)?;
    init_logging(&config);

    let token = match &cli.command {
        Commands::Login { token } => token.clone(),
        _ => None,
    };
    let mut app = App::start(config, token).await?;
    app.navigate();

    let result = run(cli.command, &mut app, &output).await;

    if let Err(e) = app.finish() {
        tracing::warn!("Failed to save session cookies: {:#}", e);
    }
    result
}

async fn run(command: Commands, app: &mut App, output: &Output) -> Result<()> {
    match command {
        Commands::Login { .. } => commands::auth::login(app, output).await,
        Commands::Logout => commands::auth::logout(app, output).await,
        Commands::Whoami => commands::auth::whoami(app, output),
        Commands::Invitations { command } => handle_invitation_command(command, app, output).await,
        Commands::Join { id } => commands::invitation::join(app, id, output).await,
        Commands::Leave { id } => commands::invitation::leave(app, id, output).await,
        Commands::Comment { command } => handle_comment_command(command, app, output).await,
        Commands::Reply { command } => handle_reply_command(command, app, output).await,
        Commands::User { command } => match command {
            UserCommands::Show { id, tab, page } => {
                commands::user::show(app, id, tab, page, output).await
            }
        },
        Commands::Follow { id } => commands::user::follow(app, id, output).await,
        Commands::Unfollow { id } => commands::user::unfollow(app, id, output).await,
        Commands::Tags => commands::tag::list(app, output).await,
        // Handled before the session starts
        Commands::Theme { .. } | Commands::Config { .. } => Ok(()),
    }
}

async fn handle_invitation_command(
    command: InvitationCommands,
    app: &App,
    output: &Output,
) -> Result<()> {
    match command {
        InvitationCommands::List {
            title,
            tag,
            after,
            before,
            min,
            max,
            page,
        } => {
            let query = SearchQuery {
                title,
                tags: tag,
                start_after: after,
                start_before: before,
                min_capacity: min,
                max_capacity: max,
                page,
            };
            commands::invitation::list(app, query, output).await
        }
        InvitationCommands::Show { id, replies } => {
            commands::invitation::show(app, id, replies, output).await
        }
        InvitationCommands::Create { fields } => {
            commands::invitation::create(app, fields.into(), output).await
        }
        InvitationCommands::Edit { id, fields } => {
            commands::invitation::edit(app, id, fields.into(), output).await
        }
        InvitationCommands::Delete { id, yes } => {
            commands::invitation::delete(app, id, yes, output).await
        }
    }
}

async fn handle_comment_command(command: CommentCommands, app: &App, output: &Output) -> Result<()> {
    match command {
        CommentCommands::Add {
            invitation,
            content,
        } => commands::comment::add(app, invitation, content, output).await,
        CommentCommands::Edit {
            invitation,
            id,
            content,
        } => commands::comment::edit(app, invitation, id, content, output).await,
        CommentCommands::Delete { invitation, id } => {
            commands::comment::delete(app, invitation, id, output).await
        }
    }
}

async fn handle_reply_command(command: ReplyCommands, app: &App, output: &Output) -> Result<()> {
    match command {
        ReplyCommands::List { comment } => commands::reply::list(app, comment, output).await,
        ReplyCommands::Add { comment, content } => {
            commands::reply::add(app, comment, content, output).await
        }
        ReplyCommands::Edit {
            comment,
            id,
            content,
        } => commands::reply::edit(app, comment, id, content, output).await,
        ReplyCommands::Delete { comment, id } => {
            commands::reply::delete(app, comment, id, output).await
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

fn handle_theme_command(
    command: Option<ThemeCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ThemeCommands::Show) | None => commands::theme::show(config_path, output),
        Some(ThemeCommands::Toggle) => commands::theme::toggle(config_path, output),
        Some(ThemeCommands::Set { theme }) => commands::theme::set(theme, config_path, output),
    }
}

/// Initialize logging
///
/// The level comes from RSVP_LOG (default: warn). Logs go to stderr, or
/// are appended to config.log_file when one is set.
fn init_logging(config: &Config) {
    let log_level = std::env::var("RSVP_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::new(format!("rsvp_core={},rsvp_cli={}", log_level, log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match config.log_file {
        Some(ref log_path) => {
            let file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };
            let _ = builder.with_ansi(false).with_writer(file).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
