//! Memoised loading of canonical datasets.
//!
//! [`DataManager`] keeps one [`SalesDataset`] per distinct source list. A
//! repeated request for the same list is served from memory; a different list
//! is a cache miss. Entries live until the caller invalidates them or drops
//! the manager.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use sales_core::error::Result;
use sales_data::reader::{load_sales, SalesDataset};

/// Process-scoped cache of canonical datasets keyed by source list.
///
/// # Example
/// ```no_run
/// use std::path::PathBuf;
/// use sales_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::new();
/// let sources = vec![PathBuf::from("Sales_January_2019.csv")];
/// let dataset = mgr.get_or_load(&sources).expect("load");
/// println!("records: {}", dataset.len());
/// ```
#[derive(Default)]
pub struct DataManager {
    /// Loaded datasets, keyed by the exact ordered source list.
    cache: HashMap<Vec<PathBuf>, Arc<SalesDataset>>,
    /// Human-readable description of the last load error.
    last_error: Option<String>,
    /// Number of ingests actually performed (cache misses).
    loads: u64,
}

impl DataManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the dataset for `sources`, ingesting it on a cache miss.
    ///
    /// A failed load leaves the cache untouched and is returned as an error.
    pub fn get_or_load(&mut self, sources: &[PathBuf]) -> Result<Arc<SalesDataset>> {
        if let Some(dataset) = self.cache.get(sources) {
            tracing::debug!(sources = sources.len(), "returning cached dataset");
            return Ok(Arc::clone(dataset));
        }

        match load_sales(sources) {
            Ok(dataset) => {
                self.loads += 1;
                self.last_error = None;
                let dataset = Arc::new(dataset);
                tracing::debug!(
                    records = dataset.len(),
                    sources = sources.len(),
                    "dataset cache updated"
                );
                self.cache.insert(sources.to_vec(), Arc::clone(&dataset));
                Ok(dataset)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dataset load failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop any cached entry for `sources` and ingest again.
    pub fn reload(&mut self, sources: &[PathBuf]) -> Result<Arc<SalesDataset>> {
        self.invalidate(sources);
        self.get_or_load(sources)
    }

    /// Remove the entry for `sources`. Returns `true` if one existed.
    pub fn invalidate(&mut self, sources: &[PathBuf]) -> bool {
        let removed = self.cache.remove(sources).is_some();
        if removed {
            tracing::debug!(sources = sources.len(), "cache entry invalidated");
        }
        removed
    }

    /// Discard every cached dataset.
    pub fn clear(&mut self) {
        self.cache.clear();
        tracing::debug!("cache cleared");
    }

    pub fn is_cached(&self, sources: &[PathBuf]) -> bool {
        self.cache.contains_key(sources)
    }

    /// Number of cached datasets.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// How many ingests have run since construction.
    pub fn load_count(&self) -> u64 {
        self.loads
    }

    /// Description of the last load error, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "Order ID,Product,Quantity Ordered,Price Each,Order Date,Purchase Address\n\
                       1,Widget,3,50.00,01/22/19 21:25,\"1 Main St, Springfield, IL 00000\"\n";

    fn write_source(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, CSV).expect("write");
        path
    }

    // ── cache hits and misses ─────────────────────────────────────────────

    #[test]
    fn test_cache_miss_then_hit() {
        let dir = TempDir::new().expect("tempdir");
        let sources = vec![write_source(&dir, "a.csv")];
        let mut mgr = DataManager::new();

        assert!(!mgr.is_cached(&sources));
        let first = mgr.get_or_load(&sources).expect("load");
        assert_eq!(mgr.load_count(), 1);
        assert!(mgr.is_cached(&sources));

        let second = mgr.get_or_load(&sources).expect("load");
        assert_eq!(mgr.load_count(), 1, "second call must not re-ingest");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_different_source_list_is_a_miss() {
        let dir = TempDir::new().expect("tempdir");
        let a = write_source(&dir, "a.csv");
        let b = write_source(&dir, "b.csv");
        let mut mgr = DataManager::new();

        mgr.get_or_load(&[a.clone()]).expect("load");
        mgr.get_or_load(&[a.clone(), b.clone()]).expect("load");
        // Same files, different order: still a distinct key.
        mgr.get_or_load(&[b, a]).expect("load");

        assert_eq!(mgr.load_count(), 3);
        assert_eq!(mgr.len(), 3);
    }

    #[test]
    fn test_cached_dataset_survives_source_change() {
        let dir = TempDir::new().expect("tempdir");
        let sources = vec![write_source(&dir, "a.csv")];
        let mut mgr = DataManager::new();

        let first = mgr.get_or_load(&sources).expect("load");
        std::fs::write(&sources[0], "Order ID\n").unwrap();
        let again = mgr.get_or_load(&sources).expect("load");
        assert_eq!(again.len(), first.len());

        let reloaded = mgr.reload(&sources).expect("reload");
        assert!(reloaded.is_empty());
        assert_eq!(mgr.load_count(), 2);
    }

    // ── invalidation ──────────────────────────────────────────────────────

    #[test]
    fn test_invalidate_and_clear() {
        let dir = TempDir::new().expect("tempdir");
        let sources = vec![write_source(&dir, "a.csv")];
        let mut mgr = DataManager::new();

        mgr.get_or_load(&sources).expect("load");
        assert!(mgr.invalidate(&sources));
        assert!(!mgr.invalidate(&sources));
        assert!(mgr.is_empty());

        mgr.get_or_load(&sources).expect("load");
        mgr.clear();
        assert!(mgr.is_empty());
        assert_eq!(mgr.load_count(), 2);
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = TempDir::new().expect("tempdir");
        let good = write_source(&dir, "a.csv");
        let sources = vec![good, dir.path().join("missing.csv")];
        let mut mgr = DataManager::new();

        assert!(mgr.get_or_load(&sources).is_err());
        assert!(!mgr.is_cached(&sources));
        assert!(mgr.last_error().unwrap().contains("missing.csv"));
        assert_eq!(mgr.load_count(), 0);
    }
}
