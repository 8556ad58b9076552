//! SQLite-backed persistence: user accounts with credit counters and
//! the report history.

pub mod accounts;
pub mod reports;

use std::path::Path;

use rusqlite::Connection;
use uuid::Uuid;

pub use accounts::{NewUser, UserRecord};
pub use reports::ReportStore;

/// Errors that can occur during storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("report not found: {0}")]
    ReportNotFound(Uuid),

    #[error("{0}")]
    Invalid(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StoreError>;

/// Account and report store over a single SQLite database file
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                username       TEXT NOT NULL,
                username_lower TEXT NOT NULL UNIQUE,
                password_hash  TEXT NOT NULL,
                email          TEXT NOT NULL UNIQUE,
                name           TEXT NOT NULL,
                credits        INTEGER NOT NULL,
                is_admin       INTEGER NOT NULL DEFAULT 0,
                created_at     TEXT NOT NULL,
                last_login     TEXT
            );
            CREATE TABLE IF NOT EXISTS reports (
                id         TEXT PRIMARY KEY,
                owner      TEXT NOT NULL,
                idea       TEXT NOT NULL,
                transcript TEXT NOT NULL,
                document   BLOB NOT NULL,
                language   TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS reports_owner ON reports (owner);",
        )?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Shared helper: persisted timestamps are RFC 3339 UTC strings
pub(crate) fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| StoreError::Corrupt(format!("invalid timestamp {s:?}: {e}")))
}
