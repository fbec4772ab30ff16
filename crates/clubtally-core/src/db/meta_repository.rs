//! Sync metadata repository implementation
//!
//! Small key-value accessor over the `sync_meta` table, used to persist
//! per-table pull watermarks across process restarts.

use rusqlite::{params, Connection};

use crate::error::Result;

/// Trait for sync metadata storage operations
pub trait MetaRepository {
    /// Read a metadata value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a metadata value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Read the pull watermark for a table
    fn watermark(&self, table: &str) -> Result<Option<String>> {
        self.get(&format!("watermark:{table}"))
    }

    /// Persist the pull watermark for a table
    fn set_watermark(&self, table: &str, value: &str) -> Result<()> {
        self.set(&format!("watermark:{table}"), value)
    }
}

/// `SQLite` implementation of `MetaRepository`
pub struct SqliteMetaRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteMetaRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl MetaRepository for SqliteMetaRepository<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM sync_meta WHERE key = ?",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO sync_meta (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_watermark_defaults_to_none() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.conn().unwrap();
        let repo = SqliteMetaRepository::new(&conn);

        assert_eq!(repo.watermark("members").unwrap(), None);
    }

    #[test]
    fn test_watermark_roundtrip_and_overwrite() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.conn().unwrap();
        let repo = SqliteMetaRepository::new(&conn);

        repo.set_watermark("members", "2026-02-01T00:00:00.000Z")
            .unwrap();
        assert_eq!(
            repo.watermark("members").unwrap().as_deref(),
            Some("2026-02-01T00:00:00.000Z")
        );

        repo.set_watermark("members", "2026-02-02T00:00:00.000Z")
            .unwrap();
        assert_eq!(
            repo.watermark("members").unwrap().as_deref(),
            Some("2026-02-02T00:00:00.000Z")
        );

        // Per-table keys are independent
        assert_eq!(repo.watermark("payments").unwrap(), None);
    }
}
