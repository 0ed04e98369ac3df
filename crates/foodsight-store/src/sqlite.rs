//! SQLite-backed conversation repository.
//!
//! One connection behind a mutex. Messages cascade with their conversation
//! through the foreign key, so `PRAGMA foreign_keys` must be on.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use foodsight_core::{Error, Result};

use crate::repository::{conversation_not_found, validate_title, ConversationRepository};
use crate::schema::SCHEMA_SQL;
use crate::types::{from_millis, Conversation, Message, MonotonicClock, NewMessage, Role};

pub const DB_FILE_NAME: &str = "foodsight.db";

struct Inner {
    conn: Connection,
    clock: MonotonicClock,
}

pub struct SqliteRepository {
    inner: Mutex<Inner>,
    db_path: Option<PathBuf>,
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}

impl SqliteRepository {
    /// Open or create the store. The file will be `db_dir/foodsight.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join(DB_FILE_NAME);

        let conn = Connection::open(&db_path).map_err(db_err)?;
        let repo = Self::from_connection(conn, Some(db_path))?;
        info!(
            "SqliteRepository initialized: {} conversations, path={}",
            repo.count_conversations()?,
            db_dir.display()
        );
        Ok(repo)
    }

    /// A private database that lives as long as the repository.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(db_err)?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(Self {
            inner: Mutex::new(Inner {
                conn,
                clock: MonotonicClock::default(),
            }),
            db_path,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn count_conversations(&self) -> Result<i64> {
        let inner = self.inner.lock();
        inner
            .conn
            .query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
            .map_err(db_err)
    }

    fn row_to_conversation(row: &Row<'_>) -> rusqlite::Result<Conversation> {
        Ok(Conversation {
            id: row.get("id")?,
            title: row.get("title")?,
            created_at: from_millis(row.get("created_at")?),
            updated_at: from_millis(row.get("updated_at")?),
        })
    }

    fn row_to_message(row: &Row<'_>) -> rusqlite::Result<Message> {
        let role: String = row.get("role")?;
        Ok(Message {
            id: row.get("id")?,
            conversation_id: row.get("conversation_id")?,
            role: Role::parse(&role).unwrap_or(Role::User),
            content: row.get("content")?,
            created_at: from_millis(row.get("created_at")?),
        })
    }

    fn exists(conn: &Connection, id: i64) -> Result<bool> {
        let found: Option<i64> = conn
            .prepare_cached("SELECT id FROM conversations WHERE id = ?1")
            .map_err(db_err)?
            .query_row(params![id], |row| row.get(0))
            .optional()
            .map_err(db_err)?;
        Ok(found.is_some())
    }
}

impl ConversationRepository for SqliteRepository {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn create_conversation(&self, title: &str) -> Result<Conversation> {
        let title = validate_title(title)?;
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = inner.clock.next_millis();
        let id = inner
            .conn
            .prepare_cached(
                "INSERT INTO conversations (title, created_at, updated_at) VALUES (?1, ?2, ?2)",
            )
            .map_err(db_err)?
            .insert(params![title, now])
            .map_err(db_err)?;
        debug!(id, "Conversation created");
        Ok(Conversation {
            id,
            title,
            created_at: from_millis(now),
            updated_at: from_millis(now),
        })
    }

    fn get_conversations(&self) -> Result<Vec<Conversation>> {
        let inner = self.inner.lock();
        let mut stmt = inner
            .conn
            .prepare_cached("SELECT * FROM conversations ORDER BY updated_at DESC, id DESC")
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], Self::row_to_conversation)
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    fn get_conversation(&self, id: i64) -> Result<Option<Conversation>> {
        let inner = self.inner.lock();
        let row = inner
            .conn
            .prepare_cached("SELECT * FROM conversations WHERE id = ?1")
            .map_err(db_err)?
            .query_row(params![id], Self::row_to_conversation)
            .optional()
            .map_err(db_err)?;
        Ok(row)
    }

    fn delete_conversation(&self, id: i64) -> Result<bool> {
        let inner = self.inner.lock();
        let count = inner
            .conn
            .execute("DELETE FROM conversations WHERE id = ?1", params![id])
            .map_err(db_err)?;
        if count > 0 {
            debug!(id, "Conversation deleted");
        }
        Ok(count > 0)
    }

    fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        let inner = self.inner.lock();
        if !Self::exists(&inner.conn, conversation_id)? {
            return Err(conversation_not_found(conversation_id));
        }
        let mut stmt = inner
            .conn
            .prepare_cached(
                "SELECT * FROM messages WHERE conversation_id = ?1 ORDER BY created_at ASC, id ASC",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![conversation_id], Self::row_to_message)
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    fn create_message(&self, message: NewMessage) -> Result<Message> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = inner.clock.next_millis();

        let tx = inner.conn.transaction().map_err(db_err)?;
        let bumped = tx
            .execute(
                "UPDATE conversations SET updated_at = ?2 WHERE id = ?1",
                params![message.conversation_id, now],
            )
            .map_err(db_err)?;
        if bumped == 0 {
            return Err(conversation_not_found(message.conversation_id));
        }
        let id = tx
            .prepare_cached(
                "INSERT INTO messages (conversation_id, role, content, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(db_err)?
            .insert(params![
                message.conversation_id,
                message.role.as_str(),
                message.content,
                now
            ])
            .map_err(db_err)?;
        tx.commit().map_err(db_err)?;

        Ok(Message {
            id,
            conversation_id: message.conversation_id,
            role: message.role,
            content: message.content,
            created_at: from_millis(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::conformance;
    use tempfile::TempDir;

    #[test]
    fn test_conformance_in_memory() {
        conformance::run_all(&SqliteRepository::open_in_memory().unwrap());
    }

    #[test]
    fn test_conformance_on_disk() {
        let dir = TempDir::new().unwrap();
        let repo = SqliteRepository::open(dir.path()).unwrap();
        assert!(repo.db_path().unwrap().ends_with(DB_FILE_NAME));
        conformance::run_all(&repo);
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let id = {
            let repo = SqliteRepository::open(dir.path()).unwrap();
            let c = repo.create_conversation("Pronóstico").unwrap();
            repo.create_message(NewMessage {
                conversation_id: c.id,
                role: Role::Assistant,
                content: "Proyección lista".into(),
            })
            .unwrap();
            c.id
        };

        let repo = SqliteRepository::open(dir.path()).unwrap();
        assert_eq!(repo.count_conversations().unwrap(), 1);
        let messages = repo.get_messages(id).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[0].content, "Proyección lista");
    }

    #[test]
    fn test_cascade_removes_rows() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let c = repo.create_conversation("x").unwrap();
        for _ in 0..3 {
            repo.create_message(NewMessage {
                conversation_id: c.id,
                role: Role::User,
                content: "m".into(),
            })
            .unwrap();
        }
        repo.delete_conversation(c.id).unwrap();
        let inner = repo.inner.lock();
        let remaining: i64 = inner
            .conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
