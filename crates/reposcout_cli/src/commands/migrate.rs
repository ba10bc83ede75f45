//! `reposcout migrate`: manage the visit-history schema by hand.
//!
//! Other commands migrate on connect, so this is mostly for rollbacks and
//! inspecting a database after an upgrade.

use reposcout::db;
use reposcout::migration::{Migrator, MigratorTrait};

use crate::MigrateAction;

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    match action {
        MigrateAction::Up => {
            let pending = Migrator::get_pending_migrations(&db).await?.len();
            if pending == 0 {
                println!("Visit history schema is up to date.");
            } else {
                Migrator::up(&db, None).await?;
                println!("Applied {} migration(s) to the visit history.", pending);
            }
        }
        MigrateAction::Down => {
            Migrator::down(&db, Some(1)).await?;
            println!("Rolled back the newest visit history migration.");
        }
        MigrateAction::Status => {
            Migrator::status(&db).await?;
        }
        MigrateAction::Fresh => {
            Migrator::fresh(&db).await?;
            println!("Visit history dropped and schema recreated.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn up_and_status_on_empty_database() {
        handle_migrate(MigrateAction::Up, "sqlite::memory:")
            .await
            .expect("migrating a new database should succeed");
        handle_migrate(MigrateAction::Status, "sqlite::memory:")
            .await
            .expect("status should succeed");
    }
}
