//! SQLite cache of block header times. Block times never change once committed,
//! so entries are never invalidated.

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Height → RFC3339 time store.
pub struct BlockTimeCache {
    conn: Mutex<Connection>,
}

impl BlockTimeCache {
    /// Open or create cache at `path`. Creates parent dirs if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, CacheError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, CacheError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS block_times (
                height INTEGER PRIMARY KEY,
                time TEXT NOT NULL,
                created_utc INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn get(&self, height: i64) -> Result<Option<String>, CacheError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let mut stmt = conn.prepare("SELECT time FROM block_times WHERE height = ?1")?;
        let row = stmt
            .query_row([height], |r| r.get::<_, String>(0))
            .optional()?;
        Ok(row)
    }

    pub fn set(&self, height: i64, time: &str) -> Result<(), CacheError> {
        let created = time::OffsetDateTime::now_utc().unix_timestamp();
        let conn = self
            .conn
            .lock()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO block_times (height, time, created_utc) VALUES (?1, ?2, ?3)",
            rusqlite::params![height, time, created],
        )?;
        Ok(())
    }
}
