//! Model conversion from GitHub API types to reposcout search items.

use super::types::GitHubRepo;
use crate::search::SearchItem;

/// Owner login of a repository.
///
/// Search results occasionally omit the owner object; fall back to the
/// prefix of `full_name`.
fn owner_login(repo: &GitHubRepo) -> String {
    match &repo.owner {
        Some(owner) => owner.login.clone(),
        None => repo
            .full_name
            .split_once('/')
            .map(|(owner, _)| owner.to_string())
            .unwrap_or_default(),
    }
}

/// Convert a GitHub repository to a (not yet visited) search item.
pub fn to_search_item(repo: &GitHubRepo) -> SearchItem {
    SearchItem {
        id: repo.id,
        name: repo.name.clone(),
        owner: owner_login(repo),
        full_name: repo.full_name.clone(),
        html_url: repo.html_url.clone(),
        description: repo.description.clone().filter(|d| !d.trim().is_empty()),
        language: repo.language.clone(),
        stars: repo.stargazers_count,
        visited: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::GitHubOwner;

    fn repo() -> GitHubRepo {
        GitHubRepo {
            id: 1296269,
            name: "Hello-World".to_string(),
            full_name: "octocat/Hello-World".to_string(),
            owner: Some(GitHubOwner {
                login: "octocat".to_string(),
            }),
            html_url: "https://github.com/octocat/Hello-World".to_string(),
            description: Some("This your first repo!".to_string()),
            language: Some("Rust".to_string()),
            stargazers_count: Some(80),
            forks_count: Some(9),
            updated_at: None,
            archived: false,
            fork: false,
        }
    }

    #[test]
    fn test_to_search_item() {
        let item = to_search_item(&repo());

        assert_eq!(item.id, 1296269);
        assert_eq!(item.owner, "octocat");
        assert_eq!(item.name, "Hello-World");
        assert_eq!(item.full_name, "octocat/Hello-World");
        assert_eq!(item.description.as_deref(), Some("This your first repo!"));
        assert_eq!(item.language.as_deref(), Some("Rust"));
        assert_eq!(item.stars, Some(80));
        assert!(!item.visited);
    }

    #[test]
    fn test_to_search_item_without_owner_uses_full_name() {
        let mut repo = repo();
        repo.owner = None;
        assert_eq!(to_search_item(&repo).owner, "octocat");
    }

    #[test]
    fn test_blank_description_is_dropped() {
        let mut repo = repo();
        repo.description = Some("   ".to_string());
        assert!(to_search_item(&repo).description.is_none());
    }
}
