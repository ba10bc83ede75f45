use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entity::visited_repository::{ActiveModel, Column, Entity as VisitedRepository, Model};
use crate::search::SearchItem;

use super::errors::{Result, VisitedError};

// ─── Single Record Operations ────────────────────────────────────────────────

/// Record a visit to `item`.
///
/// The first visit inserts a row. Later visits refresh the stored details,
/// move `visited_at` to now, and bump `visit_count`.
///
/// # Errors
/// Returns `VisitedError::InvalidInput` if the item has no usable ID or name.
pub async fn save(db: &DatabaseConnection, item: &SearchItem) -> Result<Model> {
    validate(item)?;

    let now = Utc::now().fixed_offset();
    let stars = item.stars.map(i64::from);

    match find_by_id(db, item.id).await? {
        Some(existing) => {
            let visit_count = existing.visit_count.saturating_add(1);
            let mut model: ActiveModel = existing.into();
            model.owner = Set(item.owner.clone());
            model.name = Set(item.name.clone());
            model.full_name = Set(item.full_name.clone());
            model.html_url = Set(item.html_url.clone());
            model.description = Set(item.description.clone());
            model.language = Set(item.language.clone());
            model.stars = Set(stars);
            model.visited = Set(true);
            model.visited_at = Set(now);
            model.visit_count = Set(visit_count);
            model.update(db).await.map_err(VisitedError::from)
        }
        None => {
            let model = ActiveModel {
                id: Set(item.id),
                owner: Set(item.owner.clone()),
                name: Set(item.name.clone()),
                full_name: Set(item.full_name.clone()),
                html_url: Set(item.html_url.clone()),
                description: Set(item.description.clone()),
                language: Set(item.language.clone()),
                stars: Set(stars),
                visited: Set(true),
                first_visited_at: Set(now),
                visited_at: Set(now),
                visit_count: Set(1),
            };
            model.insert(db).await.map_err(VisitedError::from)
        }
    }
}

fn validate(item: &SearchItem) -> Result<()> {
    if item.id <= 0 {
        return Err(VisitedError::InvalidInput {
            message: format!("repository id must be positive, got {}", item.id),
        });
    }
    if item.full_name.trim().is_empty() {
        return Err(VisitedError::InvalidInput {
            message: "repository full_name is empty".to_string(),
        });
    }
    Ok(())
}

/// Find a visited repository by its GitHub ID.
pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>> {
    VisitedRepository::find_by_id(id)
        .one(db)
        .await
        .map_err(VisitedError::from)
}

/// Find a visited repository by `owner/name`, ignoring case.
pub async fn find_by_full_name(db: &DatabaseConnection, full_name: &str) -> Result<Option<Model>> {
    let exact = VisitedRepository::find()
        .filter(Column::FullName.eq(full_name))
        .one(db)
        .await?;
    if exact.is_some() {
        return Ok(exact);
    }

    // GitHub names are case-insensitive.
    let all = VisitedRepository::find().all(db).await?;
    Ok(all
        .into_iter()
        .find(|m| m.full_name.eq_ignore_ascii_case(full_name)))
}

/// Like [`find_by_id`], but a missing row is an error.
pub async fn get(db: &DatabaseConnection, id: i64) -> Result<Model> {
    find_by_id(db, id)
        .await?
        .ok_or_else(|| VisitedError::not_found_by_id(id))
}

/// Delete a visited repository by its GitHub ID.
///
/// Returns the number of rows deleted (0 or 1).
pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    let result = VisitedRepository::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}
