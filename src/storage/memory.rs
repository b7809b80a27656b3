use std::collections::BTreeMap;

use crate::errors::Result;

use super::PrefStore;

/// Volatile store used by tests, benchmarks, and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryPrefStore {
    values: BTreeMap<String, i64>,
    flush_count: usize,
}

impl MemoryPrefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flushes observed, for asserting persistence cadence.
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }
}

impl PrefStore for MemoryPrefStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_reports_keys() {
        let mut store = MemoryPrefStore::new();
        assert!(!store.has_key("coins"));
        store.set_int("coins", 9);
        assert!(store.has_key("coins"));
        assert_eq!(store.get_int("coins"), Some(9));
    }

    #[test]
    fn flush_is_counted() {
        let mut store = MemoryPrefStore::new();
        store.flush().expect("flush");
        store.flush().expect("flush");
        assert_eq!(store.flush_count(), 2);
    }
}
