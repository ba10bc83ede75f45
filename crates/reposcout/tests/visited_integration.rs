//! Integration tests for visit history.
//!
//! These tests require the `sqlite` and `migrate` features to be enabled
//! and use an in-memory SQLite database.

#![cfg(all(feature = "sqlite", feature = "migrate"))]

use std::sync::Arc;

use async_trait::async_trait;
use reposcout::github::{AuthenticatedUser, GitHubError};
use reposcout::paging::PageToken;
use reposcout::retry::RetryConfig;
use reposcout::search::{RepositorySearch, SearchItem, SearchQuery, SearchResults, SearchSession};
use reposcout::{AuthSession, VisitedError, connect_and_migrate, visited};
use sea_orm::DatabaseConnection;
use tokio::runtime::Handle;

/// Create an in-memory SQLite database with migrations applied.
async fn setup_test_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

fn create_test_item(id: i64, owner: &str, name: &str) -> SearchItem {
    SearchItem {
        id,
        name: name.to_string(),
        owner: owner.to_string(),
        full_name: format!("{}/{}", owner, name),
        html_url: format!("https://github.com/{}/{}", owner, name),
        description: Some(format!("Test repo {}/{}", owner, name)),
        language: Some("Rust".to_string()),
        stars: Some(100),
        visited: true,
    }
}

// ─── save Tests ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_save_inserts_new_visit() {
    let db = setup_test_db().await;

    let model = visited::save(&db, &create_test_item(1, "tokio-rs", "tokio"))
        .await
        .expect("save should succeed");

    assert_eq!(model.id, 1);
    assert_eq!(model.full_name, "tokio-rs/tokio");
    assert_eq!(model.stars, Some(100));
    assert_eq!(model.visit_count, 1);
    assert!(model.visited);
    assert_eq!(model.first_visited_at, model.visited_at);
    assert_eq!(visited::count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_save_again_updates_in_place() {
    let db = setup_test_db().await;

    let first = visited::save(&db, &create_test_item(1, "tokio-rs", "tokio"))
        .await
        .unwrap();

    let mut renamed = create_test_item(1, "tokio-rs", "tokio");
    renamed.stars = Some(25_000);
    renamed.description = None;
    let second = visited::save(&db, &renamed).await.unwrap();

    assert_eq!(visited::count(&db).await.unwrap(), 1);
    assert_eq!(second.visit_count, 2);
    assert_eq!(second.stars, Some(25_000));
    assert!(second.description.is_none());
    assert_eq!(second.first_visited_at, first.first_visited_at);
    assert!(second.visited_at >= first.visited_at);
}

#[tokio::test]
async fn test_save_rejects_invalid_item() {
    let db = setup_test_db().await;

    let err = visited::save(&db, &create_test_item(0, "o", "r"))
        .await
        .expect_err("zero id should be rejected");
    assert!(matches!(err, VisitedError::InvalidInput { .. }));
    assert_eq!(visited::count(&db).await.unwrap(), 0);
}

// ─── Query Tests ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_find_recent_newest_first_with_limit() {
    let db = setup_test_db().await;

    for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
        visited::save(&db, &create_test_item(id, "octocat", name))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    // Revisiting moves a repository to the top.
    visited::save(&db, &create_test_item(1, "octocat", "a"))
        .await
        .unwrap();

    let recent = visited::find_recent(&db, 2).await.unwrap();
    let names: Vec<&str> = recent.iter().map(|m| m.full_name.as_str()).collect();
    assert_eq!(names, vec!["octocat/a", "octocat/c"]);
}

#[tokio::test]
async fn test_find_by_id_and_full_name() {
    let db = setup_test_db().await;
    visited::save(&db, &create_test_item(42, "rust-lang", "rust"))
        .await
        .unwrap();

    assert!(visited::find_by_id(&db, 42).await.unwrap().is_some());
    assert!(visited::find_by_id(&db, 43).await.unwrap().is_none());

    let found = visited::find_by_full_name(&db, "Rust-Lang/Rust")
        .await
        .unwrap()
        .expect("case-insensitive match");
    assert_eq!(found.id, 42);

    assert!(matches!(
        visited::get(&db, 43).await,
        Err(VisitedError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_visited_ids_delete_and_clear() {
    let db = setup_test_db().await;
    for id in 1..=3 {
        visited::save(&db, &create_test_item(id, "octocat", &format!("r{id}")))
            .await
            .unwrap();
    }

    let ids = visited::visited_ids(&db).await.unwrap();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&2));

    assert_eq!(visited::delete(&db, 2).await.unwrap(), 1);
    assert_eq!(visited::delete(&db, 2).await.unwrap(), 0);
    assert_eq!(visited::count(&db).await.unwrap(), 2);

    assert_eq!(visited::clear(&db).await.unwrap(), 2);
    assert_eq!(visited::count(&db).await.unwrap(), 0);
}

// ─── SearchSession::visit Tests ──────────────────────────────────────────────

struct OnePage;

#[async_trait]
impl RepositorySearch for OnePage {
    async fn search(
        &self,
        _query: &SearchQuery,
        _page: PageToken,
        _per_page: u32,
    ) -> Result<SearchResults, GitHubError> {
        let mut items = vec![
            create_test_item(10, "serde-rs", "serde"),
            create_test_item(11, "serde-rs", "json"),
        ];
        for item in &mut items {
            item.visited = false;
        }
        Ok(SearchResults {
            items,
            total_count: 2,
            next_page: None,
        })
    }
}

fn signed_in() -> AuthSession {
    let auth = AuthSession::new();
    auth.sign_in(AuthenticatedUser {
        login: "octocat".to_string(),
        name: None,
        email: Some("octocat@github.com".to_string()),
    });
    auth
}

#[tokio::test]
async fn test_session_visit_marks_item_and_records_it() {
    let db = setup_test_db().await;
    let mut session = SearchSession::new(Arc::new(OnePage), signed_in(), Handle::current())
        .with_retry_config(RetryConfig::disabled());

    session
        .set_query("serde")
        .unwrap()
        .next_response()
        .await;

    let item = session.visit(1, &db).await.expect("visit should succeed");
    assert_eq!(item.full_name, "serde-rs/json");
    assert!(item.visited);

    let list = session.list().unwrap();
    assert!(!list.items()[0].visited);
    assert!(list.items()[1].visited);

    let stored = visited::get(&db, 11).await.unwrap();
    assert_eq!(stored.full_name, "serde-rs/json");
    assert!(session.visited_ids().contains(&11));
}

#[tokio::test]
async fn test_history_marks_results_of_later_searches() {
    let db = setup_test_db().await;
    visited::save(&db, &create_test_item(10, "serde-rs", "serde"))
        .await
        .unwrap();

    let ids = visited::visited_ids(&db).await.unwrap();
    let mut session = SearchSession::new(Arc::new(OnePage), signed_in(), Handle::current())
        .with_visited_ids(ids);

    let list = session.set_query("serde").unwrap();
    list.next_response().await;

    let flags: Vec<bool> = list.items().iter().map(|i| i.visited).collect();
    assert_eq!(flags, vec![true, false]);
}

#[tokio::test]
async fn test_failed_visit_leaves_item_and_ids_unchanged() {
    // No migrations, so the visited table does not exist.
    let db = reposcout::connect("sqlite::memory:")
        .await
        .expect("in-memory connection");
    let mut session = SearchSession::new(Arc::new(OnePage), signed_in(), Handle::current())
        .with_retry_config(RetryConfig::disabled());
    session.set_query("serde").unwrap().next_response().await;

    let err = session.visit(0, &db).await.expect_err("save should fail");
    assert!(matches!(
        err,
        reposcout::SearchError::Visited(VisitedError::Database(_))
    ));

    let list = session.list().unwrap();
    assert!(!list.items()[0].visited);
    assert!(session.visited_ids().is_empty());
}
