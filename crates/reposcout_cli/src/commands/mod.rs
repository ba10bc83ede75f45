pub(crate) mod history;
pub(crate) mod login;
pub(crate) mod meta;
pub(crate) mod migrate;
pub(crate) mod search;
pub(crate) mod visit;

use console::style;
use reposcout::{GitHubClient, GitHubError};

use crate::config::Config;

/// Build a GitHub client from the configured token and API root.
pub(crate) fn github_client(config: &Config) -> Result<GitHubClient, GitHubError> {
    GitHubClient::with_api_url(config.github_token().as_deref(), config.github_api_url())
}

/// Open `url` in the default browser. Failure is reported, not fatal.
pub(crate) fn open_in_browser(url: &str, is_tty: bool) {
    match open::that(url) {
        Ok(()) => tracing::debug!(url = %url, "Opened in browser"),
        Err(e) => {
            if is_tty {
                eprintln!(
                    "{} Could not open a browser ({}). Visit {}",
                    style("!").yellow().bold(),
                    e,
                    url
                );
            } else {
                tracing::warn!(url = %url, error = %e, "Could not open browser");
            }
        }
    }
}

/// Split an `owner/name` argument, also accepting a github.com URL.
pub(crate) fn parse_repo_arg(arg: &str) -> Result<(&str, &str), String> {
    let trimmed = arg.trim().trim_end_matches('/');
    let trimmed = trimmed
        .strip_prefix("https://github.com/")
        .or_else(|| trimmed.strip_prefix("http://github.com/"))
        .or_else(|| trimmed.strip_prefix("github.com/"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    match trimmed.split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((owner, name))
        }
        _ => Err(format!(
            "Expected a repository as owner/name, got '{}'",
            arg
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_repo_arg_accepts_owner_name_and_urls() {
        assert_eq!(parse_repo_arg("tokio-rs/tokio"), Ok(("tokio-rs", "tokio")));
        assert_eq!(
            parse_repo_arg("https://github.com/rust-lang/rust/"),
            Ok(("rust-lang", "rust"))
        );
        assert_eq!(
            parse_repo_arg("github.com/serde-rs/json.git"),
            Ok(("serde-rs", "json"))
        );
    }

    #[test]
    fn parse_repo_arg_rejects_malformed_input() {
        assert!(parse_repo_arg("tokio").is_err());
        assert!(parse_repo_arg("/tokio").is_err());
        assert!(parse_repo_arg("a/b/c").is_err());
        assert!(parse_repo_arg("").is_err());
    }
}
