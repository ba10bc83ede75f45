//! History of repositories opened from search results.
//!
//! One row per repository, keyed by GitHub's numeric ID. Visiting a
//! repository again updates its row instead of adding another.

mod errors;
mod query;
mod single;

pub use errors::{Result, VisitedError};
pub use query::{DEFAULT_HISTORY_LIMIT, clear, count, find_recent, visited_ids};
pub use single::{delete, find_by_full_name, find_by_id, get, save};
