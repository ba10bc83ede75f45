//! Common re-exports for convenient entity usage.

pub use super::visited_repository::{
    ActiveModel as VisitedRepositoryActiveModel, Column as VisitedRepositoryColumn,
    Entity as VisitedRepository, Model as VisitedRepositoryModel,
};
