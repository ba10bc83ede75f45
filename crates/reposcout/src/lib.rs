//! reposcout - search GitHub repositories and keep a history of visits.
//!
//! Search results are loaded page by page through a small paging layer
//! ([`paging`]) that separates *when* a page is needed from *how* it is
//! fetched. Repositories opened from the results are recorded in a local
//! database ([`visited`]).
//!
//! # Features
//!
//! - `sqlite` (default) / `postgres` - Database backend for visit history.
//! - `migrate` (default) - Enables database migration support. When enabled,
//!   you can use [`connect_and_migrate`] to run migrations on connection.
//!
//! # Example
//!
//! ```ignore
//! use reposcout::{AuthSession, GitHubClient, SearchSession, connect_and_migrate};
//!
//! let db = connect_and_migrate("sqlite://reposcout.db?mode=rwc").await?;
//! let client = Arc::new(GitHubClient::new(&token)?);
//!
//! let auth = AuthSession::new();
//! auth.restore(&client).await?;
//!
//! let mut session = SearchSession::new(client, auth, Handle::current());
//! let list = session.set_query("async runtime")?;
//! list.next_response().await;
//! session.visit(0, &db).await?;
//! ```

pub mod auth;
pub mod db;
pub mod entity;
pub mod github;
pub mod paging;
pub mod retry;
pub mod search;
pub mod visited;

#[cfg(feature = "migrate")]
pub mod migration;

pub use auth::{AuthError, AuthSession, AuthStatus, AuthenticationState};
pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use github::{GitHubClient, GitHubError};
pub use search::{NetworkState, NetworkStatus, SearchError, SearchItem, SearchSession};
pub use visited::VisitedError;
