//! CourseSage Store: SQLite catalog, quiz and recommendation persistence.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::*;
