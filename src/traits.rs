//! # Cache Traits
//!
//! Generic seams over cache implementations, so workloads, benches and tests
//! can drive any cache with the same code.
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&, &K) → bool                 │
//!   │  len(&) → usize                         │
//!   │  capacity(&) → usize                    │
//!   │  clear(&mut)                            │
//!   └──────────────────┬──────────────────────┘
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │           MutableCache<K, V>            │
//!   │  remove(&mut, &K) → Option<V>           │
//!   └─────────────────────────────────────────┘
//!
//!   ConcurrentCache: marker (Send + Sync) for caches whose operations take
//!   `&self` and synchronize internally.
//! ```
//!
//! `CoreCache` and `MutableCache` describe single-owner caches such as
//! [`LruCore`](crate::policy::lru::LruCore). They carry no eviction hook;
//! hooks belong to [`ConcurrentLruCache`](crate::policy::lru::ConcurrentLruCache).
//!
//! ## Example
//!
//! ```
//! use memocache::policy::lru::LruCore;
//! use memocache::traits::{CoreCache, MutableCache};
//!
//! fn warm<C: CoreCache<u64, String>>(cache: &mut C, pages: &[(u64, &str)]) {
//!     for (id, body) in pages {
//!         cache.insert(*id, body.to_string());
//!     }
//! }
//!
//! let mut cache: LruCore<u64, String> = LruCore::new(2);
//! warm(&mut cache, &[(1, "one"), (2, "two"), (3, "three")]);
//! assert!(!CoreCache::contains(&cache, &1));
//! assert_eq!(MutableCache::remove(&mut cache, &3), Some("three".to_string()));
//! ```

/// Operations every cache supports.
pub trait CoreCache<K, V> {
    /// Inserts or updates `key`, returning the replaced value on update.
    ///
    /// An insert that pushes out another entry to stay within capacity still
    /// returns `None`; the evicted entry is dropped.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value for `key`, marking it as recently used.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` is cached. Does not affect recency.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries; 0 means unbounded.
    fn capacity(&self) -> usize;

    fn clear(&mut self);
}

/// Caches that support removing arbitrary keys.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes several keys, returning one result per key in order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// Marker for caches that are safe to share across threads.
pub trait ConcurrentCache: Send + Sync {}
