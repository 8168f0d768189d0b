//! The module cache (C6, `SPEC_FULL.md` §4.5.1): one bucket per canonical
//! module path, keyed inside that bucket by parameter hash, with
//! insertion-ordered FIFO eviction once a bucket grows past [`THRESHOLD`].
//!
//! Generic over the cached value `T` so this crate stays decoupled from
//! the resolved document representation (`ymc_ast::Value`) — the resolver
//! (C7) is the only caller that cares what `T` is.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Size at which a path's parameter-hash bucket is trimmed.
pub const THRESHOLD: usize = 50;
/// Number of oldest entries dropped once [`THRESHOLD`] is exceeded.
pub const EVICT_BATCH: usize = 25;

/// One cached compile result, stamped with the source hash it was built
/// from so a stale hit can be detected without re-parsing.
#[derive(Clone, Debug)]
pub struct CacheEntry<T> {
    pub source_hash: String,
    pub value: T,
}

#[derive(Default)]
pub struct ModuleCache<T> {
    paths: IndexMap<PathBuf, IndexMap<String, CacheEntry<T>>>,
}

impl<T> ModuleCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `(path, param_hash)`. If the stored entry's source hash no
    /// longer matches `current_source_hash`, it's evicted and treated as a
    /// miss (`SPEC_FULL.md` invariant 7: editing source on disk invalidates
    /// the cache).
    pub fn get(&mut self, path: &Path, param_hash: &str, current_source_hash: &str) -> Option<&T> {
        let is_stale = self
            .paths
            .get(path)
            .and_then(|bucket| bucket.get(param_hash))
            .map(|entry| entry.source_hash != current_source_hash)?;

        if is_stale {
            if let Some(bucket) = self.paths.get_mut(path) {
                bucket.shift_remove(param_hash);
            }
            return None;
        }
        self.paths.get(path)?.get(param_hash).map(|entry| &entry.value)
    }

    /// Inserts or overwrites the entry for `(path, param_hash)`, then trims
    /// the bucket's oldest [`EVICT_BATCH`] entries if it now exceeds
    /// [`THRESHOLD`].
    pub fn insert(&mut self, path: PathBuf, param_hash: String, source_hash: String, value: T) {
        let bucket = self.paths.entry(path).or_default();
        bucket.insert(param_hash, CacheEntry { source_hash, value });

        if bucket.len() > THRESHOLD {
            let evict_count = EVICT_BATCH.min(bucket.len());
            let stale_keys: Vec<String> = bucket.keys().take(evict_count).cloned().collect();
            for key in stale_keys {
                bucket.shift_remove(&key);
            }
        }
    }

    /// Drops every entry for `path` (used when the dependency graph purges
    /// a path no entry point reaches any more).
    pub fn remove_path(&mut self, path: &Path) {
        self.paths.shift_remove(path);
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.paths.contains_key(path)
    }

    pub fn bucket_len(&self, path: &Path) -> usize {
        self.paths.get(path).map_or(0, IndexMap::len)
    }

    pub fn reset(&mut self) {
        self.paths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> PathBuf {
        PathBuf::from("/mod.yaml")
    }

    #[test]
    fn hit_returns_cached_value() {
        let mut cache = ModuleCache::new();
        cache.insert(p(), "hash-empty".into(), "src1".into(), 42);
        assert_eq!(cache.get(&p(), "hash-empty", "src1"), Some(&42));
    }

    #[test]
    fn source_hash_mismatch_is_a_miss_and_evicts() {
        let mut cache = ModuleCache::new();
        cache.insert(p(), "hash-empty".into(), "src1".into(), 42);
        assert_eq!(cache.get(&p(), "hash-empty", "src2"), None);
        assert_eq!(cache.bucket_len(&p()), 0);
    }

    #[test]
    fn unknown_param_hash_is_a_miss() {
        let mut cache = ModuleCache::new();
        cache.insert(p(), "a".into(), "src1".into(), 1);
        assert_eq!(cache.get(&p(), "b", "src1"), None);
    }

    #[test]
    fn eviction_trims_oldest_batch_past_threshold() {
        let mut cache: ModuleCache<u32> = ModuleCache::new();
        for i in 0..THRESHOLD {
            cache.insert(p(), format!("h{i}"), "src".into(), i as u32);
        }
        assert_eq!(cache.bucket_len(&p()), THRESHOLD);

        cache.insert(p(), format!("h{THRESHOLD}"), "src".into(), THRESHOLD as u32);
        assert_eq!(cache.bucket_len(&p()), THRESHOLD + 1 - EVICT_BATCH);
        // the oldest entries are gone; the newest survives
        assert_eq!(cache.get(&p(), "h0", "src"), None);
        assert_eq!(cache.get(&p(), &format!("h{THRESHOLD}"), "src"), Some(&(THRESHOLD as u32)));
    }

    #[test]
    fn remove_path_drops_whole_bucket() {
        let mut cache = ModuleCache::new();
        cache.insert(p(), "a".into(), "src".into(), 1);
        cache.remove_path(&p());
        assert!(!cache.contains_path(&p()));
    }
}
