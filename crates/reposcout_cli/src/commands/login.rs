//! Sign-in commands.
//!
//! Uses the OAuth device flow when an OAuth App client ID is configured, with
//! a personal access token as the fallback.

use console::{Term, style};

use reposcout::github::oauth::{DEFAULT_SCOPE, poll_for_token, request_device_code};
use reposcout::{AuthSession, AuthenticationState, GitHubClient};

use crate::config::Config;

const TOKEN_SETTINGS_URL: &str = "https://github.com/settings/tokens";

/// Handle the login command.
pub(crate) async fn handle_login(
    token: Option<String>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();

    let token = match token {
        Some(token) => token.trim().to_string(),
        None => match config.oauth_client_id() {
            Some(client_id) => match device_flow(client_id, is_tty).await {
                Ok(token) => token,
                Err(e) => {
                    if is_tty {
                        eprintln!("OAuth authorization failed, falling back: {}", e);
                    }
                    read_token_with_prompt(is_tty)?
                }
            },
            None => read_token_with_prompt(is_tty)?,
        },
    };

    if token.is_empty() {
        return Err("Empty token provided".into());
    }

    // Only save tokens GitHub accepts.
    let client = GitHubClient::with_api_url(Some(&token), config.github_api_url())?;
    let auth = AuthSession::new();
    if auth.restore(&client).await? != AuthenticationState::Authenticated {
        return Err("GitHub rejected the token".into());
    }

    let config_path = Config::save_github_token(&token)?;

    if is_tty {
        println!();
        println!(
            "{} GitHub token saved to: {}",
            style("✓").green().bold(),
            config_path.display()
        );
        println!("{}", auth.welcome_message());
        println!();
        println!("You can now search repositories:");
        println!("  reposcout search \"async runtime\" --sort stars");
    } else {
        tracing::info!(
            config_path = %config_path.display(),
            user = ?auth.user().map(|u| u.login),
            "GitHub authentication successful"
        );
    }

    Ok(())
}

/// Handle the logout command.
pub(crate) fn handle_logout() -> Result<(), Box<dyn std::error::Error>> {
    match Config::clear_github_token()? {
        Some(path) => println!(
            "{} Removed GitHub token from: {}",
            style("✓").green().bold(),
            path.display()
        ),
        None => println!("No saved GitHub token."),
    }

    if std::env::var_os("GITHUB_TOKEN").is_some() {
        println!("GITHUB_TOKEN is still set in the environment and will be used.");
    }

    Ok(())
}

/// Handle the whoami command.
pub(crate) async fn handle_whoami(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = super::github_client(config)?;
    let auth = AuthSession::new();

    match auth.restore(&client).await? {
        AuthenticationState::Authenticated => {
            println!("{}", auth.welcome_message());
            if let Some(user) = auth.user() {
                println!("  login: {}", style(&user.login).cyan());
                if let Some(name) = &user.name {
                    println!("  name:  {}", name);
                }
            }
        }
        AuthenticationState::Unauthenticated | AuthenticationState::Unknown => {
            println!("Not signed in. Run `reposcout login` first.");
        }
    }

    Ok(())
}

async fn device_flow(client_id: &str, is_tty: bool) -> Result<String, Box<dyn std::error::Error>> {
    let device_code = request_device_code(client_id, DEFAULT_SCOPE).await?;

    let clipboard_success = copy_to_clipboard(&device_code.user_code);

    if is_tty {
        println!("Please visit: {}", device_code.verification_uri);
        println!();
        if clipboard_success {
            println!("Your code: {} (copied to clipboard)", device_code.user_code);
        } else {
            println!("Your code: {}", device_code.user_code);
        }
        println!();
        println!(
            "Waiting for authorization (expires in {} seconds)...",
            device_code.expires_in
        );
    } else {
        tracing::info!(
            verification_uri = %device_code.verification_uri,
            user_code = %device_code.user_code,
            "Please authorize the application"
        );
    }

    let _ = open::that(&device_code.verification_uri);

    let token_response = poll_for_token(client_id, &device_code).await?;
    Ok(token_response.access_token)
}

fn read_token_with_prompt(is_tty: bool) -> Result<String, Box<dyn std::error::Error>> {
    let token = if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        token.trim().to_string()
    } else if is_tty {
        println!(
            "No OAuth App is configured (github.oauth_client_id).\n\
             Please create a Personal Access Token on:\n\
             {}\n",
            TOKEN_SETTINGS_URL
        );

        let token = rpassword::prompt_password("Enter GitHub token: ")?;
        token.trim().to_string()
    } else {
        return Err("No token provided. Pass --token or set GITHUB_TOKEN.".into());
    };

    if token.is_empty() {
        return Err("Empty token provided".into());
    }

    Ok(token)
}

/// Try to copy text to clipboard, returning true if successful.
fn copy_to_clipboard(text: &str) -> bool {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => clipboard.set_text(text).is_ok(),
        Err(_) => false,
    }
}
