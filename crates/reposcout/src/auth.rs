//! Sign-in state shared between the CLI and the search session.
//!
//! The state starts as [`AuthenticationState::Unknown`] and is settled by
//! verifying a stored token against GitHub. Observers subscribe to a
//! `tokio::sync::watch` channel and always see the latest value.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use crate::github::{AuthenticatedUser, GitHubClient, GitHubError};

/// Whether a GitHub user is signed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthenticationState {
    /// The token has not been checked yet, or checking it failed for a
    /// reason other than the token being rejected.
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// Errors from authentication checks.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not signed in. Run `reposcout login` first.")]
    NotAuthenticated,

    #[error("Sign-in has not been verified yet")]
    Unverified,

    #[error("Could not verify sign-in: {0}")]
    Lookup(#[from] GitHubError),
}

/// Snapshot of the sign-in state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthStatus {
    pub state: AuthenticationState,
    /// Present exactly when `state` is `Authenticated`.
    pub user: Option<AuthenticatedUser>,
}

/// Observable sign-in state. Clones share the same state.
#[derive(Debug, Clone)]
pub struct AuthSession {
    status: Arc<watch::Sender<AuthStatus>>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthSession {
    /// A session in the [`AuthenticationState::Unknown`] state.
    pub fn new() -> Self {
        let (status, _) = watch::channel(AuthStatus::default());
        Self {
            status: Arc::new(status),
        }
    }

    /// Verify the client's token and settle the state.
    ///
    /// A client without a token, or whose token GitHub rejects, leaves the
    /// session `Unauthenticated`. Other failures (network, rate limits)
    /// leave the state unchanged and are returned.
    pub async fn restore(&self, client: &GitHubClient) -> Result<AuthenticationState, AuthError> {
        if !client.is_authenticated() {
            self.sign_out();
            return Ok(AuthenticationState::Unauthenticated);
        }

        self.apply_lookup(client.current_user().await)
    }

    /// Settle the state from the result of a `/user` lookup.
    pub fn apply_lookup(
        &self,
        lookup: Result<AuthenticatedUser, GitHubError>,
    ) -> Result<AuthenticationState, AuthError> {
        match lookup {
            Ok(user) => {
                self.sign_in(user);
                Ok(AuthenticationState::Authenticated)
            }
            Err(GitHubError::AuthRequired) => {
                tracing::info!("Stored GitHub token was rejected");
                self.sign_out();
                Ok(AuthenticationState::Unauthenticated)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not verify GitHub token");
                Err(AuthError::Lookup(e))
            }
        }
    }

    /// Record a signed-in user.
    pub fn sign_in(&self, user: AuthenticatedUser) {
        tracing::debug!(login = %user.login, "Signed in");
        self.status.send_replace(AuthStatus {
            state: AuthenticationState::Authenticated,
            user: Some(user),
        });
    }

    /// Forget the signed-in user.
    pub fn sign_out(&self) {
        self.status.send_replace(AuthStatus {
            state: AuthenticationState::Unauthenticated,
            user: None,
        });
    }

    pub fn state(&self) -> AuthenticationState {
        self.status.borrow().state
    }

    pub fn user(&self) -> Option<AuthenticatedUser> {
        self.status.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthenticationState::Authenticated
    }

    /// Receive every future state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    /// "Welcome" followed by the user's email (or login) when signed in.
    pub fn welcome_message(&self) -> String {
        match self.user() {
            Some(user) => format!("Welcome {}", user.display_handle()),
            None => "Welcome".to_string(),
        }
    }

    /// Fail unless a user is signed in.
    pub fn require_authenticated(&self) -> Result<(), AuthError> {
        match self.state() {
            AuthenticationState::Authenticated => Ok(()),
            AuthenticationState::Unauthenticated => Err(AuthError::NotAuthenticated),
            AuthenticationState::Unknown => Err(AuthError::Unverified),
        }
    }
}
