use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use std::path::{Path, PathBuf};

/// LocalStore is a small string key/value table in SQLite.
/// It plays the role browser local storage plays for a web app:
/// each key holds one serialized JSON document.
pub struct LocalStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl LocalStore {
    /// Open (or create) the store at `db_path`, creating parent directories
    pub fn open(db_path: &Path) -> SqlResult<Self> {
        if let Some(parent) = db_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Could not create {}: {}", parent.display(), e);
            }
        }

        let conn = Connection::open(db_path)?;
        log::info!("Local store opened at: {}", db_path.display());

        let store = LocalStore {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// A store that lives only as long as the process
    pub fn open_in_memory() -> SqlResult<Self> {
        let store = LocalStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key     TEXT PRIMARY KEY NOT NULL,
                value   TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Path to the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&PathBuf> {
        self.db_path.as_ref()
    }

    pub fn get_item(&self, key: &str) -> SqlResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Insert or replace the value under `key`
    pub fn set_item(&self, key: &str, value: &str) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> SqlResult<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = LocalStore::open_in_memory().unwrap();
        assert_eq!(store.get_item("missing").unwrap(), None);

        store.set_item("k", "one").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("one"));

        store.set_item("k", "two").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("two"));

        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
        // removing twice is fine
        store.remove_item("k").unwrap();
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.db");

        {
            let store = LocalStore::open(&path).unwrap();
            store.set_item("greeting", "hello").unwrap();
            assert_eq!(store.path(), Some(&path));
        }

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("greeting").unwrap().as_deref(), Some("hello"));
    }
}
