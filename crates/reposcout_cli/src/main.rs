//! reposcout CLI - search GitHub repositories and keep a visit history.

mod commands;
mod config;
mod progress;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use reposcout::search::SearchSort;

use crate::commands::history::OutputFormat;

#[derive(Parser)]
#[command(name = "reposcout")]
#[command(version)]
#[command(about = "Search GitHub repositories from the terminal")]
#[command(
    long_about = "reposcout searches GitHub repositories page by page, loading more results \
as you scroll. Repositories you open are remembered in a local database and marked in \
later searches."
)]
#[command(after_long_help = r#"EXAMPLES
    Sign in with GitHub (device flow):
        $ reposcout login

    Search, most starred first:
        $ reposcout search "async runtime" --sort stars

    Fetch three pages as JSON for scripting:
        $ reposcout search tokio --pages 3 --output json

    Open a repository and record the visit:
        $ reposcout visit tokio-rs/tokio

    Show recently visited repositories:
        $ reposcout history --limit 10

CONFIGURATION
    reposcout reads configuration from:
      1. ~/.config/reposcout/config.toml (or $XDG_CONFIG_HOME/reposcout/config.toml)
      2. ./reposcout.toml
      3. Environment variables (REPOSCOUT_* prefix, e.g., REPOSCOUT_GITHUB__TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    REPOSCOUT_DATABASE__URL            Database connection string (default: ~/.local/state/reposcout/reposcout.db)
    REPOSCOUT_GITHUB__TOKEN            GitHub token
    REPOSCOUT_GITHUB__OAUTH_CLIENT_ID  OAuth App client ID used by `reposcout login`
    GITHUB_TOKEN                       Used when no token is configured
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to GitHub and save the token
    Login {
        /// Save this personal access token instead of running the device flow
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove the saved GitHub token
    Logout,
    /// Show the signed-in GitHub user
    Whoami,
    /// Search repositories
    Search {
        /// Search text (GitHub search qualifiers are allowed)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Pages to fetch before printing (non-interactive mode)
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Results per page (default from config or 30, max 100)
        #[arg(long)]
        per_page: Option<u32>,

        /// Sort order: stars, forks or updated (default: best match)
        #[arg(short, long)]
        sort: Option<SearchSort>,

        /// Print results instead of browsing them interactively
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },
    /// Open a repository in the browser and record the visit
    Visit {
        /// Repository as owner/name
        repo: String,

        /// Record the visit without opening a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Show recently visited repositories
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,

        /// Maximum rows to show (default from config or 20)
        #[arg(short, long)]
        limit: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Forget one repository
    Forget {
        /// Repository as owner/name
        repo: String,
    },
    /// Forget every visited repository
    Clear,
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    shutdown::setup_shutdown_handler();

    // Initialize tracing for non-TTY mode (structured logging)
    // Only initialize if not connected to a TTY
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("reposcout=info,reposcout_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    // Handle commands that don't require database access first
    match cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
            return Ok(());
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output)?;
            return Ok(());
        }
        Commands::Login { token } => {
            commands::login::handle_login(token, &config).await?;
            return Ok(());
        }
        Commands::Logout => {
            commands::login::handle_logout()?;
            return Ok(());
        }
        Commands::Whoami => {
            commands::login::handle_whoami(&config).await?;
            return Ok(());
        }
        command => run_with_database(command, &config).await,
    }
}

async fn run_with_database(
    command: Commands,
    config: &config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = config
        .database_url()
        .ok_or("Could not determine a database URL; set database.url in the config file")?;

    // Ensure the database directory exists for SQLite
    if database_url.starts_with("sqlite://") {
        let db_path = database_url.trim_start_matches("sqlite://");
        // Strip query parameters (e.g., ?mode=rwc) before path operations
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        // Warn if using a relative path (can cause issues depending on cwd)
        if db_path.is_relative() && !db_path.as_os_str().is_empty() {
            tracing::warn!(
                "Database path '{}' is relative - behavior depends on current directory. \
                 Consider using an absolute path.",
                db_path.display()
            );
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    match command {
        Commands::Search {
            query,
            pages,
            per_page,
            sort,
            output,
        } => {
            let options = commands::search::SearchOptions {
                query: query.join(" "),
                pages,
                per_page,
                sort,
                output,
            };
            commands::search::handle_search(options, config, &database_url).await?;
        }
        Commands::Visit { repo, no_open } => {
            commands::visit::handle_visit(&repo, !no_open, config, &database_url).await?;
        }
        Commands::History {
            action,
            limit,
            output,
        } => {
            let limit = limit.unwrap_or(config.history.limit);
            commands::history::handle_history(action, limit, output, &database_url).await?;
        }
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Login { .. }
        | Commands::Logout
        | Commands::Whoami
        | Commands::Completions { .. }
        | Commands::Man { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn search_joins_query_words() {
        let cli = Cli::try_parse_from([
            "reposcout", "search", "async", "runtime", "--sort", "stars", "-p", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                query, pages, sort, ..
            } => {
                assert_eq!(query.join(" "), "async runtime");
                assert_eq!(pages, 2);
                assert_eq!(sort, Some(SearchSort::Stars));
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn search_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["reposcout", "search", "x", "--sort", "best"]).is_err());
    }

    #[test]
    fn search_requires_query() {
        assert!(Cli::try_parse_from(["reposcout", "search"]).is_err());
    }

    #[test]
    fn history_clear_subcommand() {
        let cli = Cli::try_parse_from(["reposcout", "history", "clear"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History {
                action: Some(HistoryAction::Clear),
                ..
            }
        ));
    }

    #[test]
    fn history_defaults_to_table() {
        let cli = Cli::try_parse_from(["reposcout", "history"]).unwrap();
        match cli.command {
            Commands::History {
                action,
                limit,
                output,
            } => {
                assert!(action.is_none());
                assert!(limit.is_none());
                assert_eq!(output, OutputFormat::Table);
            }
            _ => panic!("expected history"),
        }
    }
}
