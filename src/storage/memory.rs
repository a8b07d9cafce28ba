//! In-memory storage backend

use crate::error::{JobFormError, Result};
use crate::storage::KeyValueStore;
use std::collections::HashMap;

/// HashMap-backed store. `failing()` builds one whose every call errors,
/// which is how quota-exceeded or disabled storage shows up to callers.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail: bool,
    writes: usize,
    write_limit: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn set_failing(&mut self, fail: bool) {
        self.fail = fail;
    }

    /// Let the next `n` calls to `set` succeed and fail every one after
    pub fn fail_writes_after(&mut self, n: usize) {
        self.write_limit = Some(self.writes + n);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            Err(JobFormError::Storage("storage unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        if self.write_limit.is_some_and(|limit| self.writes >= limit) {
            return Err(JobFormError::Storage("quota exceeded".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.write_count(), 1);

        store.remove("a").unwrap();
        assert!(store.is_empty());

        // Removing again is fine
        store.remove("a").unwrap();
    }

    #[test]
    fn test_failing_store() {
        let mut store = MemoryStore::failing();
        assert!(store.get("a").is_err());
        assert!(store.set("a", "1").is_err());

        store.set_failing(false);
        store.set("a", "1").unwrap();
        assert!(store.contains_key("a"));
    }

    #[test]
    fn test_fail_writes_after() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.fail_writes_after(1);

        store.set("b", "2").unwrap();
        assert!(store.set("c", "3").is_err());
        assert_eq!(store.get("b").unwrap(), Some("2".to_string()));
        store.remove("a").unwrap();
        assert_eq!(store.write_count(), 2);
    }
}
