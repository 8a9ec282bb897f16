//! Cumulative statistics across every session ever played
//!
//! Two independent counters, each written back to the store as soon as it
//! changes. A failed write is logged and never interrupts play; the other
//! counter is still written.

use crate::storage::KeyValueStore;

/// Store key for the cumulative score
pub const SCORE_KEY: &str = "cumulative_score";

/// Store key for the cumulative match count
pub const MATCHES_KEY: &str = "cumulative_matches";

/// Lifetime totals, loaded once at startup and kept in sync with the store
pub struct GlobalStats {
    store: Box<dyn KeyValueStore>,
    total_score: u64,
    total_matches: u64,
}

impl GlobalStats {
    /// Load totals from `store`. Missing or unreadable values count as 0.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let total_score = read_counter(store.as_ref(), SCORE_KEY);
        let total_matches = read_counter(store.as_ref(), MATCHES_KEY);
        tracing::info!(total_score, total_matches, "loaded global stats");

        GlobalStats {
            store,
            total_score,
            total_matches,
        }
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn total_matches(&self) -> u64 {
        self.total_matches
    }

    /// Add to both totals and persist each one immediately
    pub fn record(&mut self, points: u64, matches: u64) {
        self.total_score = self.total_score.saturating_add(points);
        write_counter(self.store.as_mut(), SCORE_KEY, self.total_score);

        self.total_matches = self.total_matches.saturating_add(matches);
        write_counter(self.store.as_mut(), MATCHES_KEY, self.total_matches);
    }
}

fn read_counter(store: &dyn KeyValueStore, key: &str) -> u64 {
    match store.get(key) {
        Ok(Some(raw)) => match raw.trim().parse::<u64>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "ignoring unparseable stored counter");
                0
            }
        },
        Ok(None) => 0,
        Err(e) => {
            tracing::warn!(key, "failed to read stored counter: {}", e);
            0
        }
    }
}

fn write_counter(store: &mut dyn KeyValueStore, key: &str, value: u64) {
    if let Err(e) = store.set(key, &value.to_string()) {
        tracing::warn!(key, value, "failed to persist counter: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, Storage, StorageError};

    /// Store whose writes to one key always fail
    struct FailingKey {
        inner: MemoryStore,
        broken: &'static str,
    }

    impl KeyValueStore for FailingKey {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.broken {
                return Err(StorageError::NoDataDirectory);
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_empty_store_loads_zero() {
        let stats = GlobalStats::load(Box::new(MemoryStore::new()));
        assert_eq!(stats.total_score(), 0);
        assert_eq!(stats.total_matches(), 0);
    }

    #[test]
    fn test_unparseable_values_load_zero() {
        let mut store = MemoryStore::new();
        store.set(SCORE_KEY, "not a number").unwrap();
        store.set(MATCHES_KEY, "-4").unwrap();

        let stats = GlobalStats::load(Box::new(store));
        assert_eq!(stats.total_score(), 0);
        assert_eq!(stats.total_matches(), 0);
    }

    #[test]
    fn test_existing_values_load() {
        let mut store = MemoryStore::new();
        store.set(SCORE_KEY, "120").unwrap();
        store.set(MATCHES_KEY, "12").unwrap();

        let stats = GlobalStats::load(Box::new(store));
        assert_eq!(stats.total_score(), 120);
        assert_eq!(stats.total_matches(), 12);
    }

    #[test]
    fn test_record_accumulates() {
        let mut stats = GlobalStats::load(Box::new(MemoryStore::new()));
        stats.record(10, 1);
        stats.record(5, 1);
        stats.record(0, 1);
        assert_eq!(stats.total_score(), 15);
        assert_eq!(stats.total_matches(), 3);
    }

    #[test]
    fn test_totals_survive_restarts() {
        let dir = tempfile::tempdir().unwrap();

        let mut stats = GlobalStats::load(Box::new(Storage::open_in(dir.path()).unwrap()));
        stats.record(10, 1);
        drop(stats);

        let mut stats = GlobalStats::load(Box::new(Storage::open_in(dir.path()).unwrap()));
        assert_eq!(stats.total_score(), 10);
        stats.record(5, 1);
        drop(stats);

        let stats = GlobalStats::load(Box::new(Storage::open_in(dir.path()).unwrap()));
        assert_eq!(stats.total_score(), 15);
        assert_eq!(stats.total_matches(), 2);
    }

    #[test]
    fn test_failed_write_affects_one_counter() {
        let store = FailingKey {
            inner: MemoryStore::new(),
            broken: SCORE_KEY,
        };
        let mut stats = GlobalStats::load(Box::new(store));
        stats.record(10, 1);

        // in-memory totals keep going
        assert_eq!(stats.total_score(), 10);
        assert_eq!(stats.total_matches(), 1);

        assert_eq!(stats.store.get(MATCHES_KEY).unwrap(), Some("1".to_string()));
        assert_eq!(stats.store.get(SCORE_KEY).unwrap(), None);
    }
}
