//! SeaORM entity definitions for the reposcout database schema.

pub mod prelude;
pub mod visited_repository;
