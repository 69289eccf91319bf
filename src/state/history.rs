use log::{info, warn};

use super::data::{HistoryEntry, QrResult};
use super::storage::LocalStore;
use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::error::AppResult;

/// Storage key holding the JSON array of entries
pub const HISTORY_KEY: &str = "qr_history";

/// History keeps the most recent generated codes, newest first.
/// Every change is written through to the local store.
#[derive(Debug)]
pub struct History {
    store: LocalStore,
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl History {
    /// Load history from `store`. A missing key means an empty history;
    /// unreadable JSON is logged and treated as empty.
    pub fn load(store: LocalStore, limit: usize) -> Self {
        let limit = limit.max(1);
        let entries = match store.get_item(HISTORY_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<HistoryEntry>>(&json) {
                Ok(mut entries) => {
                    entries.truncate(limit);
                    entries
                }
                Err(e) => {
                    warn!("Discarding unreadable history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read history: {}", e);
                Vec::new()
            }
        };

        info!("History loaded with {} entries", entries.len());
        History {
            store,
            entries,
            limit,
        }
    }

    /// History on a throwaway in-memory store
    pub fn in_memory() -> AppResult<Self> {
        Ok(Self::load(LocalStore::open_in_memory()?, DEFAULT_HISTORY_LIMIT))
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn get(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Insert `result` as the newest entry, evicting the oldest past the limit.
    /// `now_ms` seeds the id; it is bumped if an entry already uses it.
    /// Nothing changes in memory if the write fails.
    pub fn push(&mut self, result: QrResult, now_ms: i64) -> AppResult<&HistoryEntry> {
        let max_id = self.entries.iter().map(|entry| entry.id).max();
        let id = match max_id {
            Some(max) if max >= now_ms => max + 1,
            _ => now_ms,
        };

        let mut entries = Vec::with_capacity(self.limit);
        entries.push(HistoryEntry { id, result });
        entries.extend(self.entries.iter().take(self.limit - 1).cloned());

        self.persist(&entries)?;
        self.entries = entries;
        Ok(&self.entries[0])
    }

    /// Remove every entry
    pub fn clear(&mut self) -> AppResult<()> {
        self.store.remove_item(HISTORY_KEY)?;
        self.entries.clear();
        info!("History cleared");
        Ok(())
    }

    fn persist(&self, entries: &[HistoryEntry]) -> AppResult<()> {
        let json = serde_json::to_string(entries)?;
        self.store.set_item(HISTORY_KEY, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ContentKind;
    use crate::state::options::{EcLevel, QrOptions};
    use chrono::{TimeZone, Utc};

    fn result(name: &str) -> QrResult {
        QrResult {
            content: format!("https://{}", name),
            kind: ContentKind::Link,
            name: name.to_string(),
            image: "data:image/png;base64,AAAA".to_string(),
            options: QrOptions::default(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut history = History::in_memory().unwrap();
        history.push(result("a.com"), 1_000).unwrap();
        history.push(result("b.com"), 2_000).unwrap();

        let names: Vec<_> = history.entries().iter().map(|e| e.result.name.as_str()).collect();
        assert_eq!(names, ["b.com", "a.com"]);
    }

    #[test]
    fn test_never_exceeds_limit() {
        let mut history = History::in_memory().unwrap();
        for i in 0..25 {
            let entry = history.push(result(&format!("site{}.com", i)), 1_000 + i).unwrap();
            assert_eq!(entry.result.name, format!("site{}.com", i));
            assert!(history.len() <= 10);
        }

        assert_eq!(history.len(), 10);
        assert_eq!(history.entries()[0].result.name, "site24.com");
        assert_eq!(history.entries()[9].result.name, "site15.com");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut history = History::in_memory().unwrap();
        // same millisecond, and a clock that went backwards
        history.push(result("a.com"), 5_000).unwrap();
        history.push(result("b.com"), 5_000).unwrap();
        history.push(result("c.com"), 4_000).unwrap();

        let mut ids: Vec<_> = history.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, [5_002, 5_001, 5_000]);
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert_eq!(history.get(5_001).unwrap().result.name, "b.com");
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        {
            let mut history = History::load(LocalStore::open(&path).unwrap(), 10);
            let mut with_options = result("kept.com");
            with_options.options.error_correction = EcLevel::H;
            history.push(with_options, 42).unwrap();
        }

        let history = History::load(LocalStore::open(&path).unwrap(), 10);
        assert_eq!(history.len(), 1);
        let entry = &history.entries()[0];
        assert_eq!(entry.id, 42);
        assert_eq!(entry.result.name, "kept.com");
        assert_eq!(entry.result.options.error_correction, EcLevel::H);
    }

    #[test]
    fn test_stored_json_shape() {
        let store = LocalStore::open_in_memory().unwrap();
        let mut history = History::load(store, 10);
        history.push(result("a.com"), 7).unwrap();

        let json = history.store.get_item(HISTORY_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["id"], 7);
        assert_eq!(first["kind"], "link");
        assert_eq!(first["content"], "https://a.com");
        assert!(first["createdAt"].is_string());
        assert_eq!(first["options"]["size"], 250);
    }

    #[test]
    fn test_corrupt_history_is_discarded() {
        let store = LocalStore::open_in_memory().unwrap();
        store.set_item(HISTORY_KEY, "{not json").unwrap();

        let history = History::load(store, 10);
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut history = History::in_memory().unwrap();
        history.push(result("a.com"), 1).unwrap();
        history.clear().unwrap();

        assert!(history.is_empty());
        assert_eq!(history.store.get_item(HISTORY_KEY).unwrap(), None);
    }
}
