use std::collections::HashSet;

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};

use crate::entity::visited_repository::{Column, Entity as VisitedRepository, Model};

use super::errors::Result;

/// Default number of rows `reposcout history` shows.
pub const DEFAULT_HISTORY_LIMIT: u64 = 20;

// ─── Query Operations ────────────────────────────────────────────────────────

/// The `limit` most recently visited repositories, newest first.
pub async fn find_recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>> {
    let models = VisitedRepository::find()
        .order_by_desc(Column::VisitedAt)
        .order_by_asc(Column::FullName)
        .limit(limit)
        .all(db)
        .await?;
    Ok(models)
}

/// IDs of every visited repository.
pub async fn visited_ids(db: &DatabaseConnection) -> Result<HashSet<i64>> {
    let ids: Vec<i64> = VisitedRepository::find()
        .select_only()
        .column(Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

/// Count visited repositories.
pub async fn count(db: &DatabaseConnection) -> Result<u64> {
    let count = VisitedRepository::find().count(db).await?;
    Ok(count)
}

/// Forget all visits.
///
/// Returns the number of rows deleted.
pub async fn clear(db: &DatabaseConnection) -> Result<u64> {
    let result = VisitedRepository::delete_many().exec(db).await?;
    Ok(result.rows_affected)
}
