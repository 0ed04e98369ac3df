//! FoodSight Store: conversation and message persistence.
//!
//! [`MemoryRepository`] is the default; [`SqliteRepository`] keeps history
//! across restarts.

pub mod memory;
pub mod repository;
pub mod schema;
pub mod sqlite;
pub mod types;

use std::sync::Arc;

use foodsight_core::{DataPaths, Result, StoreBackend};

pub use memory::MemoryRepository;
pub use repository::ConversationRepository;
pub use sqlite::SqliteRepository;
pub use types::*;

/// Build the repository selected in configuration.
pub fn open_repository(
    backend: StoreBackend,
    paths: &DataPaths,
) -> Result<Arc<dyn ConversationRepository>> {
    Ok(match backend {
        StoreBackend::Memory => Arc::new(MemoryRepository::new()),
        StoreBackend::Sqlite => Arc::new(SqliteRepository::open(&paths.conversations_db)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_repository_by_backend() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path()).unwrap();

        let memory = open_repository(StoreBackend::Memory, &paths).unwrap();
        assert_eq!(memory.backend(), "memory");

        let sqlite = open_repository(StoreBackend::Sqlite, &paths).unwrap();
        assert_eq!(sqlite.backend(), "sqlite");
        assert!(paths.conversations_db.join(sqlite::DB_FILE_NAME).exists());
    }
}
