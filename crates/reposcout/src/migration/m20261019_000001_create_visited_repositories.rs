//! Initial migration to create the reposcout database schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VisitedRepositories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VisitedRepositories::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    // Naming
                    .col(
                        ColumnDef::new(VisitedRepositories::Owner)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VisitedRepositories::Name).string().not_null())
                    .col(
                        ColumnDef::new(VisitedRepositories::FullName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VisitedRepositories::HtmlUrl)
                            .text()
                            .not_null(),
                    )
                    // Content
                    .col(
                        ColumnDef::new(VisitedRepositories::Description)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VisitedRepositories::Language)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VisitedRepositories::Stars)
                            .big_integer()
                            .null(),
                    )
                    // Tracking
                    .col(
                        ColumnDef::new(VisitedRepositories::Visited)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(VisitedRepositories::FirstVisitedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(VisitedRepositories::VisitedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(VisitedRepositories::VisitCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        // History is listed newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_visited_repos_visited_at")
                    .table(VisitedRepositories::Table)
                    .col(VisitedRepositories::VisitedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_visited_repos_full_name")
                    .table(VisitedRepositories::Table)
                    .col(VisitedRepositories::FullName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VisitedRepositories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
#[sea_orm(iden = "visited_repositories")]
enum VisitedRepositories {
    Table,
    Id,
    Owner,
    Name,
    FullName,
    HtmlUrl,
    Description,
    Language,
    Stars,
    Visited,
    FirstVisitedAt,
    VisitedAt,
    VisitCount,
}
