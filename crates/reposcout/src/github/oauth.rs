//! GitHub OAuth Device Flow.
//!
//! The device flow lets a terminal program obtain a token without handling
//! the user's password:
//!
//! 1. Request a device code from GitHub
//! 2. Show the user code and verification URL
//! 3. The user enters the code in a browser
//! 4. Poll GitHub until the user completes authorization
//!
//! reposcout does not ship an OAuth App; the client ID comes from
//! configuration (`github.oauth_client_id`).
//!
//! # Example
//!
//! ```ignore
//! use reposcout::github::oauth::{poll_for_token, request_device_code};
//!
//! let device_code = request_device_code(client_id, DEFAULT_SCOPE).await?;
//! println!("Go to {} and enter {}", device_code.verification_uri, device_code.user_code);
//! let token = poll_for_token(client_id, &device_code).await?;
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scope requested by `reposcout login`. Searching needs no extra scopes;
/// `read:user` lets `/user` return the account's email.
pub const DEFAULT_SCOPE: &str = "read:user";

/// GitHub's device authorization endpoint.
const DEVICE_CODE_URL: &str = "https://github.com/login/device/code";

/// GitHub's OAuth token endpoint.
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Errors that can occur during OAuth Device Flow.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Authorization expired. Please try again.")]
    Expired,

    #[error("Authorization was denied by the user.")]
    AccessDenied,

    #[error("Invalid device code. Please restart the login process.")]
    InvalidDeviceCode,

    #[error("Too many requests. Please wait and try again.")]
    SlowDown,

    #[error("No OAuth client ID configured (set github.oauth_client_id)")]
    MissingClientId,

    #[error("GitHub error: {0}")]
    GitHub(String),
}

/// Response from GitHub's device code endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeResponse {
    /// The device verification code (sent to GitHub during polling).
    pub device_code: String,

    /// The code the user enters at the verification URL.
    pub user_code: String,

    /// The URL where the user enters the code.
    pub verification_uri: String,

    /// Seconds until the device code expires.
    pub expires_in: u64,

    /// Minimum seconds between polling requests.
    pub interval: u64,
}

/// Successful access token response from GitHub.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// The granted scopes (space-separated).
    pub scope: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
    #[serde(default)]
    interval: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Success(AccessTokenResponse),
    Error(TokenErrorResponse),
}

/// What to do after one poll of the token endpoint.
#[derive(Debug, PartialEq, Eq)]
enum PollOutcome {
    Continue,
    SlowDown(Duration),
}

/// Interpret a token endpoint error code.
fn classify_poll_error(
    err: TokenErrorResponse,
    interval: Duration,
) -> Result<PollOutcome, OAuthError> {
    match err.error.as_str() {
        "authorization_pending" => Ok(PollOutcome::Continue),
        "slow_down" => Ok(PollOutcome::SlowDown(
            err.interval
                .map(Duration::from_secs)
                .unwrap_or(interval + Duration::from_secs(5)),
        )),
        "expired_token" => Err(OAuthError::Expired),
        "access_denied" => Err(OAuthError::AccessDenied),
        "incorrect_device_code" => Err(OAuthError::InvalidDeviceCode),
        _ => Err(OAuthError::GitHub(
            err.error_description.unwrap_or(err.error),
        )),
    }
}

fn require_client_id(client_id: &str) -> Result<&str, OAuthError> {
    let client_id = client_id.trim();
    if client_id.is_empty() {
        Err(OAuthError::MissingClientId)
    } else {
        Ok(client_id)
    }
}

/// Request a device code from GitHub to start the OAuth Device Flow.
pub async fn request_device_code(
    client_id: &str,
    scope: &str,
) -> Result<DeviceCodeResponse, OAuthError> {
    let client_id = require_client_id(client_id)?;

    let response = Client::new()
        .post(DEVICE_CODE_URL)
        .header("Accept", "application/json")
        .form(&[("client_id", client_id), ("scope", scope)])
        .send()
        .await?;

    if !response.status().is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(OAuthError::GitHub(format!(
            "Failed to get device code: {}",
            text
        )));
    }

    response
        .json::<DeviceCodeResponse>()
        .await
        .map_err(|e| OAuthError::Parse(e.to_string()))
}

/// Poll GitHub for an access token after the user has been shown the device code.
///
/// Returns once the user authorizes the application, denies it, or the
/// device code expires.
pub async fn poll_for_token(
    client_id: &str,
    device_code: &DeviceCodeResponse,
) -> Result<AccessTokenResponse, OAuthError> {
    let client_id = require_client_id(client_id)?;
    let client = Client::new();
    let mut interval = Duration::from_secs(device_code.interval);
    let deadline = std::time::Instant::now() + Duration::from_secs(device_code.expires_in);

    loop {
        if std::time::Instant::now() >= deadline {
            return Err(OAuthError::Expired);
        }

        tokio::time::sleep(interval).await;

        let response = client
            .post(TOKEN_URL)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", client_id),
                ("device_code", device_code.device_code.as_str()),
                ("grant_type", DEVICE_GRANT_TYPE),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OAuthError::GitHub(format!(
                "Token request failed: {}",
                text
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| OAuthError::Parse(e.to_string()))?;

        match token_response {
            TokenResponse::Success(token) => return Ok(token),
            TokenResponse::Error(err) => match classify_poll_error(err, interval)? {
                PollOutcome::Continue => {}
                PollOutcome::SlowDown(next) => {
                    tracing::debug!(interval = ?next, "GitHub asked to slow down polling");
                    interval = next;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(code: &str, interval: Option<u64>) -> TokenErrorResponse {
        TokenErrorResponse {
            error: code.to_string(),
            error_description: None,
            interval,
        }
    }

    #[test]
    fn test_device_code_response_deserialize() {
        let json = r#"{
            "device_code": "abc123",
            "user_code": "ABCD-1234",
            "verification_uri": "https://github.com/login/device",
            "expires_in": 900,
            "interval": 5
        }"#;

        let response: DeviceCodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.device_code, "abc123");
        assert_eq!(response.user_code, "ABCD-1234");
        assert_eq!(response.verification_uri, "https://github.com/login/device");
        assert_eq!(response.expires_in, 900);
        assert_eq!(response.interval, 5);
    }

    #[test]
    fn test_token_response_untagged() {
        let ok: TokenResponse = serde_json::from_str(
            r#"{"access_token":"gho_xxx","token_type":"bearer","scope":"read:user"}"#,
        )
        .unwrap();
        assert!(matches!(ok, TokenResponse::Success(t) if t.access_token == "gho_xxx"));

        let pending: TokenResponse =
            serde_json::from_str(r#"{"error":"authorization_pending"}"#).unwrap();
        assert!(matches!(pending, TokenResponse::Error(e) if e.error == "authorization_pending"));
    }

    #[test]
    fn test_classify_poll_error() {
        let five = Duration::from_secs(5);

        assert_eq!(
            classify_poll_error(error("authorization_pending", None), five).unwrap(),
            PollOutcome::Continue
        );
        assert_eq!(
            classify_poll_error(error("slow_down", Some(12)), five).unwrap(),
            PollOutcome::SlowDown(Duration::from_secs(12))
        );
        assert_eq!(
            classify_poll_error(error("slow_down", None), five).unwrap(),
            PollOutcome::SlowDown(Duration::from_secs(10))
        );
        assert!(matches!(
            classify_poll_error(error("expired_token", None), five),
            Err(OAuthError::Expired)
        ));
        assert!(matches!(
            classify_poll_error(error("access_denied", None), five),
            Err(OAuthError::AccessDenied)
        ));
        assert!(matches!(
            classify_poll_error(error("unsupported_grant_type", None), five),
            Err(OAuthError::GitHub(msg)) if msg == "unsupported_grant_type"
        ));
    }

    #[tokio::test]
    async fn test_missing_client_id_fails_without_request() {
        let err = request_device_code("  ", DEFAULT_SCOPE)
            .await
            .expect_err("should require client id");
        assert!(matches!(err, OAuthError::MissingClientId));
    }
}
