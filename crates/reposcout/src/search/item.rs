use serde::{Deserialize, Serialize};

/// One repository in a search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    /// GitHub's numeric repository ID.
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: Option<u32>,
    /// Whether the repository has been opened from reposcout before.
    #[serde(default)]
    pub visited: bool,
}

impl SearchItem {
    #[inline]
    pub fn mark_visited(&mut self) {
        self.visited = true;
    }
}
