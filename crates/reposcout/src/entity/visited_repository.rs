//! VisitedRepository entity - repositories the user opened from search results.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "visited_repositories")]
pub struct Model {
    /// GitHub's numeric repository ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    // ─── Naming ──────────────────────────────────────────────────────────────
    pub owner: String,
    pub name: String,
    pub full_name: String,
    #[sea_orm(column_type = "Text")]
    pub html_url: String,

    // ─── Content ─────────────────────────────────────────────────────────────
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub language: Option<String>,
    /// Star count when last visited.
    pub stars: Option<i64>,

    // ─── Tracking ────────────────────────────────────────────────────────────
    #[sea_orm(default_value = true)]
    pub visited: bool,
    pub first_visited_at: DateTimeWithTimeZone,
    /// Most recent visit; history is ordered by this.
    pub visited_at: DateTimeWithTimeZone,
    #[sea_orm(default_value = 1)]
    pub visit_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Browser URL, rebuilt from the name if none was stored.
    pub fn url(&self) -> String {
        if self.html_url.is_empty() {
            format!("https://github.com/{}", self.full_name)
        } else {
            self.html_url.clone()
        }
    }
}
