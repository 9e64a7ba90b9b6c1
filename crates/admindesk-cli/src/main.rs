//! admindesk - a command-line admin console.
//!
//! Manages articles, tags, users and roles on the admin backend, keeping the
//! login session between invocations.

mod app;
mod output;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use admindesk_core::stores::articles::DEFAULT_PAGE_SIZE;

use app::App;

/// Directory for a rolling log file, in addition to stderr
const LOG_DIR_ENV: &str = "ADMINDESK_LOG_DIR";

#[derive(Debug, Parser)]
#[command(name = "admindesk", version, about = "Admin console for articles, tags, users and roles")]
struct Cli {
    /// API base URL, overriding the environment and config file
    #[arg(long, global = true, env = "ADMINDESK_API_BASE_URL")]
    base_url: Option<String>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Revoke the session and clear stored tokens
    Logout,
    /// Register a new user
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: String,
    },
    /// Show whether a session is stored
    Status,
    /// Manage tags
    #[command(subcommand)]
    Tags(TagCommand),
    /// List articles, optionally filtered by tags
    Articles {
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
    },
    /// Show one article
    Article { slug: String },
    /// Create an article from a JSON payload file
    ArticleCreate { file: PathBuf },
    /// Update an article from a JSON payload file
    ArticleUpdate { slug: String, file: PathBuf },
    /// Delete an article
    ArticleDelete { slug: String },
    /// Attach an advisor, school or visa type to an article
    Link {
        article_id: String,
        /// advisor, school or visaType
        kind: String,
        /// JSON body for the entity
        data: String,
    },
    /// Detach an advisor, school or visa type from an article
    Unlink { article_id: String, kind: String },
    /// List team members
    Users,
    /// List roles
    Roles,
    /// Create a role
    RoleCreate {
        name: String,
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
    /// List advisors
    Advisors,
    /// Generate an article slug for a title, with a random suffix
    Slug {
        title: String,
        /// Slugify the title only, without the random suffix
        #[arg(long)]
        plain: bool,
    },
    /// Load tags, users and roles at once
    Overview,
    /// Navigate to a console route
    Visit { path: String },
}

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    /// List tags with their parents
    List,
    /// Create a tag
    Create {
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename or re-parent a tag
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Delete a tag
    Delete { id: String },
}

/// Initialize the tracing subscriber for logging.
///
/// RUST_LOG controls the level (default `warn`). When `ADMINDESK_LOG_DIR` is
/// set, logs are also written to a daily file there; the returned guard must
/// be held until exit so the file writer flushes.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(io::stderr);

    match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "admindesk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing();
    info!("admindesk starting");

    let mut app = App::new(cli.base_url.as_deref(), cli.json)?;
    let result = app.run(cli.command).await;

    if let Err(ref e) = result {
        eprintln!("Error: {:#}", e);
    }
    info!(route = %app.current_route(), "admindesk shutting down");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slug_command() {
        let cli = Cli::try_parse_from(["admindesk", "slug", "Café Déjà Vu"]).unwrap();
        assert!(matches!(cli.command, Command::Slug { ref title, plain: false } if title == "Café Déjà Vu"));

        let cli = Cli::try_parse_from(["admindesk", "slug", "--plain", "Visa guide"]).unwrap();
        assert!(matches!(cli.command, Command::Slug { plain: true, .. }));
    }
}
