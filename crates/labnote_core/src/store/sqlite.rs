//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Writes are single-statement upserts; `updated_at` tracks the last write.
//! - The backing connection must have the `kv_store` table migrated.

use super::{checked_key, KeyValueStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection};
use std::path::Path;

pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps a migrated/ready connection.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        if !table_exists(&conn, "kv_store")? {
            return Err(StoreError::MissingRequiredTable("kv_store"));
        }
        Ok(Self { conn })
    }

    /// Lists stored keys, sorted.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let key = checked_key(key)?;
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv_store WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get("value")?));
        }
        Ok(None)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let key = checked_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<bool> {
        let key = checked_key(key)?;
        let changed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
