use super::{SlotResult, SlotStorage};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite-backed slot storage over the `kv_slots` table.
pub struct SqliteSlotStorage {
    conn: Connection,
}

impl SqliteSlotStorage {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> SlotResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> SlotResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotStorage for SqliteSlotStorage {
    fn get(&self, key: &str) -> SlotResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_slots WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> SlotResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSlotStorage;
    use crate::slot::SlotStorage;

    #[test]
    fn set_overwrites_previous_value() {
        let storage = SqliteSlotStorage::open_in_memory().unwrap();

        storage.set("k", "first").unwrap();
        storage.set("k", "second").unwrap();

        assert_eq!(storage.get("k").unwrap().as_deref(), Some("second"));
        let rows: i64 = storage
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn missing_key_reads_as_none_and_remove_reports_absence() {
        let storage = SqliteSlotStorage::open_in_memory().unwrap();

        assert_eq!(storage.get("absent").unwrap(), None);
        assert!(!storage.remove("absent").unwrap());

        storage.set("present", "v").unwrap();
        assert!(storage.remove("present").unwrap());
        assert_eq!(storage.get("present").unwrap(), None);
    }
}
