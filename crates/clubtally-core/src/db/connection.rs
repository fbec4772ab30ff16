//! Database connection management

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::migrations;
use crate::error::{Error, Result};

/// Wrapper around the local `SQLite` store.
///
/// Owns the single connection behind a mutex so the async sync engine and the
/// front end can share one handle. Statement-level atomicity is what the sync
/// path relies on; callers must not hold the guard across await points.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist.
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        configure(&conn)?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock and return the underlying connection.
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Database("connection lock poisoned".to_string()))
    }
}

/// Configure `SQLite` for a single-writer desktop/mobile workload.
fn configure(conn: &Connection) -> Result<()> {
    // WAL is unavailable for in-memory databases; ignore failures there
    conn.pragma_update(None, "journal_mode", "WAL").ok();
    conn.pragma_update(None, "synchronous", "NORMAL").ok();
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.conn().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_creates_file_and_reopens() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("clubtally.db");

        {
            let db = Database::open(&path).unwrap();
            db.conn()
                .unwrap()
                .execute(
                    "INSERT INTO sync_meta (key, value) VALUES ('probe', 'ok')",
                    [],
                )
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let value: String = db
            .conn()
            .unwrap()
            .query_row(
                "SELECT value FROM sync_meta WHERE key = 'probe'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(value, "ok");
    }
}
