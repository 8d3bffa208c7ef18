//! Record store
//!
//! The only component that reads or writes the record list. Everything is a
//! synchronous load-mutate-save over one session key; concurrent writers in
//! the same session are last-write-wins.

use std::sync::Arc;

use tracing::{debug, warn};

use super::models::UrlRecord;
use super::session::SessionStorage;
use crate::errors::{Result, SessionlinkerError};

/// Session key holding the serialized record list
pub const RECORDS_KEY: &str = "allUrls";

#[derive(Clone)]
pub struct RecordStore {
    storage: Arc<dyn SessionStorage>,
}

impl RecordStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Load every record in the session.
    ///
    /// Missing or unparsable content yields an empty list; corrupt data is
    /// logged and never surfaced to the caller.
    pub fn load(&self) -> Vec<UrlRecord> {
        let Some(raw) = self.storage.get_item(RECORDS_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<UrlRecord>>(&raw) {
            Ok(records) => {
                debug!("Loaded {} records from session", records.len());
                records
            }
            Err(e) => {
                warn!("Discarding unparsable record list: {}", e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, records: &[UrlRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.storage.set_item(RECORDS_KEY, json).map_err(|e| {
            SessionlinkerError::storage(format!("Failed to persist records: {}", e.message()))
        })
    }

    /// Append `records` in one combined load-then-save
    pub fn append(&self, records: Vec<UrlRecord>) -> Result<()> {
        let mut all = self.load();
        all.extend(records);
        self.save(&all)
    }

    pub fn find(&self, shortcode: &str) -> Option<UrlRecord> {
        self.load().into_iter().find(|r| r.shortcode == shortcode)
    }

    /// Delete the record with `shortcode`; returns whether one was removed
    pub fn remove(&self, shortcode: &str) -> Result<bool> {
        let mut all = self.load();
        let before = all.len();
        all.retain(|r| r.shortcode != shortcode);
        if all.len() == before {
            return Ok(false);
        }
        self.save(&all)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::session::MemorySessionStorage;
    use chrono::Utc;

    fn store() -> (Arc<MemorySessionStorage>, RecordStore) {
        let storage = Arc::new(MemorySessionStorage::unbounded());
        let store = RecordStore::new(storage.clone());
        (storage, store)
    }

    fn record(code: &str) -> UrlRecord {
        UrlRecord::new(
            uuid::Uuid::new_v4().to_string(),
            "https://example.org",
            code,
            30,
            Utc::now(),
        )
    }

    #[test]
    fn test_load_empty_when_nothing_persisted() {
        let (_, store) = store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_restores_timestamps() {
        let (_, store) = store();
        let original = record("abc123");
        store.save(std::slice::from_ref(&original)).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, vec![original]);
    }

    #[test]
    fn test_corrupt_content_degrades_to_empty() {
        let (storage, store) = store();
        storage
            .set_item(RECORDS_KEY, "{not json".to_string())
            .unwrap();
        assert!(store.load().is_empty());

        storage
            .set_item(RECORDS_KEY, r#"[{"shortcode":"x"}]"#.to_string())
            .unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_append_keeps_existing() {
        let (_, store) = store();
        store.append(vec![record("one")]).unwrap();
        store.append(vec![record("two"), record("three")]).unwrap();

        let codes: Vec<String> = store.load().into_iter().map(|r| r.shortcode).collect();
        assert_eq!(codes, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_remove() {
        let (_, store) = store();
        store.append(vec![record("keep"), record("drop")]).unwrap();

        assert!(store.remove("drop").unwrap());
        assert!(!store.remove("drop").unwrap());
        assert!(store.find("drop").is_none());
        assert!(store.find("keep").is_some());
    }

    #[test]
    fn test_save_failure_reported() {
        let storage = Arc::new(MemorySessionStorage::new(16));
        let store = RecordStore::new(storage);
        let err = store.save(&[record("abc123")]).unwrap_err();
        assert!(matches!(err, SessionlinkerError::Storage(_)));
    }
}
