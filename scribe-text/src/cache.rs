//! Thread-safe, evicting key→value store.
//!
//! An [`LruCache`] behind a [`Mutex`]. The lock covers map reads and
//! writes only; the value generator of [`ThreadSafeCache::get_or_insert_with`]
//! runs with the lock released, so concurrent misses on different keys
//! compute in parallel.
//!
//! Two threads missing on the same key both compute; the later insert
//! replaces the earlier one. Values must therefore be a deterministic
//! function of the key.
//!
//! Insert and lookup are O(1); the entry count never exceeds the capacity.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;
use rustc_hash::FxBuildHasher;

/// Bounded LRU map safe to share between threads.
pub struct ThreadSafeCache<K, V> {
    map: Mutex<LruCache<K, V, FxBuildHasher>>,
}

impl<K: Hash + Eq, V: Clone> ThreadSafeCache<K, V> {
    /// Create a cache holding at most `capacity` entries (minimum one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            map: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<K, V, FxBuildHasher>> {
        // A panicking generator never runs under the lock, so a poisoned
        // map is still consistent.
        self.map.lock().unwrap_or_else(|poisoned| {
            log::warn!("Recovering poisoned cache lock");
            poisoned.into_inner()
        })
    }

    /// Cached value for `key`, marking it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Store `value`, evicting the least recently used entry when full.
    pub fn insert(&self, key: K, value: V) {
        self.lock().put(key, value);
    }

    /// Cached value for `key`, or the result of `generator` which is then
    /// stored. The generator runs without holding the lock.
    pub fn get_or_insert_with(&self, key: K, generator: impl FnOnce(&K) -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = generator(&key);
        self.insert(key, value.clone());
        value
    }

    pub fn contains(&self, key: &K) -> bool {
        self.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_get_or_insert_hit_skips_generator() {
        let cache = ThreadSafeCache::new(4);
        let calls = Cell::new(0);
        let generate = |k: &u32| {
            calls.set(calls.get() + 1);
            k * 10
        };
        assert_eq!(cache.get_or_insert_with(1, generate), 10);
        assert_eq!(cache.get_or_insert_with(1, generate), 10);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_capacity_bound() {
        let cache = ThreadSafeCache::new(3);
        for i in 0..10u32 {
            cache.insert(i, i);
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&0), None);
        assert_eq!(cache.get(&9), Some(9));
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let cache = ThreadSafeCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        // Touch "a" so "b" becomes the eviction candidate.
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);
        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"c"));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache: ThreadSafeCache<i32, i32> = ThreadSafeCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert(1, 1);
        cache.insert(2, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = ThreadSafeCache::new(2);
        cache.insert(1, "first");
        cache.insert(1, "second");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some("second"));
    }

    #[test]
    fn test_clear() {
        let cache = ThreadSafeCache::new(8);
        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 8);
    }

    #[test]
    fn test_generator_runs_unlocked() {
        let cache = ThreadSafeCache::new(4);
        cache.insert(1, 1);
        let value = cache.get_or_insert_with(2, |_| cache.len() + 10);
        assert_eq!(value, 11);
        assert_eq!(cache.get(&2), Some(11));
    }
}
