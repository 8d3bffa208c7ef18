//! Session-scoped key/value storage
//!
//! Mirrors the browser `sessionStorage` contract: string keys, string
//! values, a per-session byte quota, and no lifetime beyond the session.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::errors::{Result, SessionlinkerError};

pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`; fails when the session quota would be exceeded.
    fn set_item(&self, key: &str, value: String) -> Result<()>;

    fn remove_item(&self, key: &str);

    fn clear(&self);

    /// Bytes currently held (keys + values)
    fn used_bytes(&self) -> usize;
}

/// In-memory session storage
#[derive(Debug)]
pub struct MemorySessionStorage {
    items: RwLock<HashMap<String, String>>,
    quota_bytes: usize,
}

impl MemorySessionStorage {
    pub fn new(quota_bytes: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota_bytes,
        }
    }

    /// Storage without a quota
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        let mut items = self.items.write();

        let current: usize = items.iter().map(|(k, v)| k.len() + v.len()).sum();
        let replaced = items.get(key).map_or(0, |old| key.len() + old.len());
        let projected = current - replaced + key.len() + value.len();
        if projected > self.quota_bytes {
            return Err(SessionlinkerError::storage(format!(
                "Session quota exceeded: {} bytes needed, {} allowed",
                projected, self.quota_bytes
            )));
        }

        items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.write().remove(key);
    }

    fn clear(&self) {
        self.items.write().clear();
    }

    fn used_bytes(&self) -> usize {
        self.items
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemorySessionStorage::unbounded();
        assert_eq!(storage.get_item("allUrls"), None);

        storage.set_item("allUrls", "[]".to_string()).unwrap();
        assert_eq!(storage.get_item("allUrls").as_deref(), Some("[]"));

        storage.remove_item("allUrls");
        assert_eq!(storage.get_item("allUrls"), None);
    }

    #[test]
    fn test_quota_enforced() {
        let storage = MemorySessionStorage::new(10);
        assert!(storage.set_item("k", "12345".to_string()).is_ok());
        assert_eq!(storage.used_bytes(), 6);

        let err = storage.set_item("k2", "123456789".to_string()).unwrap_err();
        assert!(matches!(err, SessionlinkerError::Storage(_)));
        // 失败时原值保持不变
        assert_eq!(storage.get_item("k").as_deref(), Some("12345"));
        assert_eq!(storage.get_item("k2"), None);
    }

    #[test]
    fn test_quota_counts_replacement_not_addition() {
        let storage = MemorySessionStorage::new(10);
        storage.set_item("k", "123456789".to_string()).unwrap();
        // 覆盖同一个 key 时不应把旧值重复计算
        assert!(storage.set_item("k", "987654321".to_string()).is_ok());
    }

    #[test]
    fn test_clear() {
        let storage = MemorySessionStorage::unbounded();
        storage.set_item("a", "1".to_string()).unwrap();
        storage.set_item("b", "2".to_string()).unwrap();
        storage.clear();
        assert_eq!(storage.used_bytes(), 0);
    }
}
