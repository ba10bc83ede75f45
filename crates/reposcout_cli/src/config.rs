//! Configuration file support for reposcout.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `REPOSCOUT_`, sections separated
//!    by a double underscore, e.g., `REPOSCOUT_GITHUB__TOKEN`)
//! 3. Config file (./reposcout.toml, then ~/.config/reposcout/config.toml)
//! 4. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/reposcout/reposcout.db`
//! on Linux (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/reposcout/reposcout.db"  # optional, this is the default
//!
//! [github]
//! token = "ghp_..."            # written by `reposcout login`, or GITHUB_TOKEN
//! api_url = "https://api.github.com"
//! oauth_client_id = "Iv1..."   # OAuth App used by `reposcout login`
//!
//! [search]
//! per_page = 30
//! prefetch_distance = 10
//! sort = "stars"               # stars | forks | updated, omit for best match
//!
//! [history]
//! limit = 20
//! ```

use std::path::{Path, PathBuf};
use std::{fs, io};

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

use reposcout::github::{DEFAULT_API_URL, MAX_PER_PAGE};
use reposcout::paging::{DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_DISTANCE, PagedListConfig};
use reposcout::search::SearchSort;
use reposcout::visited::DEFAULT_HISTORY_LIMIT;

/// Token variable honored when no token is configured.
const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub search: SearchConfig,
    pub history: HistoryConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    pub token: Option<String>,
    /// API root, for GitHub Enterprise.
    pub api_url: Option<String>,
    /// Client ID of the OAuth App used for device flow login.
    pub oauth_client_id: Option<String>,
}

/// Default search options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results requested per page.
    pub per_page: u32,
    /// Load the next page when this close to the end of the results.
    pub prefetch_distance: usize,
    /// Sort order; best match when unset.
    pub sort: Option<SearchSort>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PAGE_SIZE,
            prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
            sort: None,
        }
    }
}

/// History listing options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Rows shown by `reposcout history`.
    pub limit: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "reposcout")
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/reposcout/config.toml)
    /// 3. Local config file (./reposcout.toml)
    /// 4. Environment variables with REPOSCOUT_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("reposcout.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./reposcout.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., REPOSCOUT_DATABASE__URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("REPOSCOUT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The default uses `mode=rwc` so the SQLite file is created on first use.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("reposcout.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Get the GitHub token from config, then `GITHUB_TOKEN`.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var(GITHUB_TOKEN_ENV).ok())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn github_api_url(&self) -> &str {
        self.github.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn oauth_client_id(&self) -> Option<&str> {
        self.github
            .oauth_client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Paged list tuning, with the page size clamped to what GitHub accepts.
    pub fn list_config(&self, per_page: Option<u32>) -> PagedListConfig {
        PagedListConfig {
            page_size: per_page
                .unwrap_or(self.search.per_page)
                .clamp(1, MAX_PER_PAGE),
            prefetch_distance: self.search.prefetch_distance,
        }
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/reposcout` or `~/.local/state/reposcout`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        project_dirs().map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }

    /// Save a GitHub token to the config file.
    ///
    /// Creates the config file and parent directories if they don't exist.
    /// Only `github.token` is touched; formatting, comments, and other
    /// settings are preserved.
    pub fn save_github_token(token: &str) -> io::Result<PathBuf> {
        let config_path = Self::require_config_path()?;
        save_github_token_to(&config_path, token)?;
        Ok(config_path)
    }

    /// Remove the GitHub token from the config file, if present.
    ///
    /// Returns the path when a token was removed.
    pub fn clear_github_token() -> io::Result<Option<PathBuf>> {
        let config_path = Self::require_config_path()?;
        if !config_path.exists() {
            return Ok(None);
        }
        let removed = clear_github_token_in(&config_path)?;
        Ok(removed.then_some(config_path))
    }

    fn require_config_path() -> io::Result<PathBuf> {
        Self::default_config_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })
    }
}

fn read_document(path: &Path) -> io::Result<toml_edit::DocumentMut> {
    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    content
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid TOML: {}", e)))
}

fn save_github_token_to(path: &Path, token: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut doc = read_document(path)?;
    if !doc.contains_key("github") {
        doc["github"] = toml_edit::table();
    }
    doc["github"]["token"] = toml_edit::value(token);

    fs::write(path, doc.to_string())
}

fn clear_github_token_in(path: &Path) -> io::Result<bool> {
    let mut doc = read_document(path)?;
    let removed = doc
        .get_mut("github")
        .and_then(|github| github.as_table_like_mut())
        .and_then(|github| github.remove("token"))
        .is_some();

    if removed {
        fs::write(path, doc.to_string())?;
    }
    Ok(removed)
}
