//! # Least Recently Used (LRU) Cache
//!
//! Bounded LRU cache used to memoize expensive lookups (fetch + parse of a
//! remote document) keyed by a canonical identifier such as the source URL.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                        ConcurrentLruCache<K, V>                          │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  Arc<Shared>: RwLock<LruCore<K, Arc<V>>> + hook + NotifyMode       │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                  │                                       │
//!   │                                  ▼                                       │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │                         LruCore<K, V>                              │ │
//!   │   │                                                                    │ │
//!   │   │   FxHashMap<K, SlotId>            (index: key → list position)     │ │
//!   │   │            │                                                       │ │
//!   │   │            ▼                                                       │ │
//!   │   │   IntrusiveList<Entry<K, V>>      (recency order)                  │ │
//!   │   │                                                                    │ │
//!   │   │   head ──► [url_3] ◄──► [url_1] ◄──► [url_2] ◄── tail              │ │
//!   │   │            (MRU)                      (LRU)                        │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `LruCore` owns entries and enforces the recency and capacity rules. It never
//! calls back into user code: every removal is handed back to its caller as a
//! value. `ConcurrentLruCache` puts the core behind one lock and turns those
//! removals into eviction hook calls.
//!
//! ## Operations
//!
//! | Method        | Lock   | Complexity | Description                            |
//! |---------------|--------|------------|----------------------------------------|
//! | `insert`      | Write  | O(1)*      | Insert or update, may evict the LRU    |
//! | `get`         | Write  | O(1)*      | Lookup, promotes to MRU                |
//! | `remove`      | Write  | O(1)*      | Remove entry, fires hook               |
//! | `clear`       | Write  | O(n)       | Remove all, fires hook per entry       |
//! | `len`         | Read   | O(1)       | Current entry count                    |
//! | `peek`        | Read   | O(1)*      | Lookup without promotion               |
//! | `contains`    | Read   | O(1)*      | Membership without promotion           |
//! | `keys`        | Read   | O(n)       | Keys from MRU to LRU                   |
//!
//! `*` amortized, dominated by hashing the key.
//!
//! ## Capacity
//!
//! A capacity of 0 disables size-based eviction. Otherwise a new key is
//! linked at the head first and, if the cache now holds `capacity + 1`
//! entries, the tail is evicted before `insert` returns. Updating an existing
//! key never evicts.
//!
//! ## Concurrency Model
//!
//! ```text
//!   Thread 1           Thread 2           Thread 3
//!      │ get(url_1)       │ len()            │ insert(url_9)
//!      ▼                  ▼                  ▼
//!   ┌──────────────────────────────────────────────────────────┐
//!   │                 parking_lot::RwLock                      │
//!   │  get() takes the WRITE lock (it reorders the list)       │
//!   │  len()/peek()/contains() take the READ lock              │
//!   │  insert()/remove()/clear() take the WRITE lock           │
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are stored as `Arc<V>`, so a value returned by `get` stays usable
//! after the entry is evicted.
//!
//! ## Eviction hook
//!
//! See [`crate::hook`]. With [`NotifyMode::Immediate`] the hook runs under the
//! write lock and must not call back into the cache.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;
use crate::hook::{EvictionCause, EvictionHook, NotifyMode, SharedHook};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{ConcurrentCache, CoreCache, MutableCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Result of [`LruCore::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<K, V> {
    /// The key was new and the cache had room.
    Added,
    /// The key was present; its previous value was replaced in place.
    Replaced(V),
    /// The key was new and the least-recently-used entry was evicted.
    Evicted { key: K, value: V },
}

/// Upper bound on entries reserved up front by [`LruCore::preallocated`].
pub const MAX_PREALLOC: usize = 1 << 20;

#[cold]
#[track_caller]
fn index_diverged() -> ! {
    panic!("lru index and recency list diverged");
}

/// Single-threaded LRU core: key index plus recency list.
///
/// Removals are returned to the caller rather than reported through a hook,
/// which keeps the core free of callbacks and lets the concurrent wrapper
/// decide when notifications run relative to its lock.
///
/// # Example
///
/// ```
/// use memocache::policy::lru::{Insertion, LruCore};
///
/// let mut cache = LruCore::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// assert_eq!(cache.get(&"a"), Some(&1));
///
/// // "b" is now least recently used
/// assert_eq!(cache.insert("c", 3), Insertion::Evicted { key: "b", value: 2 });
/// ```
pub struct LruCore<K, V> {
    index: FxHashMap<K, SlotId>,
    order: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache. `capacity == 0` means unbounded.
    pub fn new(capacity: usize) -> Self {
        LruCore {
            index: FxHashMap::default(),
            order: IntrusiveList::new(),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Creates an empty cache with storage reserved for `capacity + 1`
    /// entries, so a full cache does not reallocate when an insert
    /// momentarily links the new entry before evicting the tail.
    ///
    /// The reservation is capped at [`MAX_PREALLOC`]. Behaves like
    /// [`new`](Self::new) for an unbounded cache.
    pub fn preallocated(capacity: usize) -> Self {
        let reserve = if capacity == 0 {
            0
        } else {
            capacity.saturating_add(1).min(MAX_PREALLOC)
        };
        LruCore {
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            order: IntrusiveList::with_capacity(reserve),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `key` is cached. Does not affect recency.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts `value` under `key` and makes it the most recently used entry.
    pub fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let Some(entry) = self.order.get_mut(id) else {
                index_diverged()
            };
            let previous = std::mem::replace(&mut entry.value, value);
            self.order.move_to_front(id);

            #[cfg(debug_assertions)]
            self.debug_validate_invariants();

            return Insertion::Replaced(previous);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let id = self.order.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        let outcome = if self.capacity > 0 && self.order.len() > self.capacity {
            match self.pop_lru() {
                Some((key, value)) => {
                    #[cfg(feature = "metrics")]
                    self.metrics.record_evicted_entry();
                    Insertion::Evicted { key, value }
                },
                None => index_diverged(),
            }
        } else {
            Insertion::Added
        };

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();

        outcome
    }

    /// Returns the value for `key` and promotes it to most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.order.move_to_front(id);
        match self.order.get(id) {
            Some(entry) => Some(&entry.value),
            None => index_diverged(),
        }
    }

    /// Returns the value for `key` without changing recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let &id = self.index.get(key)?;
        let Some(entry) = self.order.get(id) else {
            index_diverged()
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_found();

        Some(&entry.value)
    }

    /// Removes `key`, returning the stored key and value.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let id = self.index.remove(key)?;
        let Some(entry) = self.order.remove(id) else {
            index_diverged()
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();

        Some((entry.key, entry.value))
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.order.pop_back()?;
        if self.index.remove(&entry.key).is_none() {
            index_diverged();
        }
        Some((entry.key, entry.value))
    }

    /// Least recently used entry, without removing or promoting it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.order.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Removes every entry, yielding them in no particular order.
    ///
    /// The cache is empty once the iterator is dropped, whether or not it was
    /// consumed. Capacity is unchanged.
    pub fn drain(&mut self) -> impl Iterator<Item = (K, V)> + '_ {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        self.order.drain().map(|entry| (entry.key, entry.value))
    }

    /// Drops every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        self.order.clear();
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Checks that the index and recency list describe the same entries.
    ///
    /// Verifies list links, equal lengths, the capacity bound, and that every
    /// indexed key points at a live node holding that same key. Since index
    /// keys are unique and lengths match, this makes the index a bijection
    /// onto the list.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.order.check_links()?;

        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but recency list holds {} entries",
                self.index.len(),
                self.order.len()
            )));
        }

        if self.capacity > 0 && self.order.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.order.len(),
                self.capacity
            )));
        }

        for (key, &id) in &self.index {
            match self.order.get(id) {
                Some(entry) if entry.key == *key => {},
                Some(_) => {
                    return Err(InvariantError::new(
                        "index handle points at an entry for another key",
                    ))
                },
                None => return Err(InvariantError::new("index handle points at a freed slot")),
            }
        }

        Ok(())
    }

    /// Panics if [`check_invariants`](Self::check_invariants) fails.
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("lru invariant violated: {err}");
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.metrics.snapshot(self.len(), self.capacity)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        match LruCore::insert(self, key, value) {
            Insertion::Replaced(previous) => Some(previous),
            Insertion::Added | Insertion::Evicted { .. } => None,
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LruCore::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LruCore::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCore::len(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        LruCore::clear(self)
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        LruCore::remove(self, key).map(|(_, value)| value)
    }
}

impl<K, V> fmt::Debug for LruCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

struct Shared<K, V> {
    core: RwLock<LruCore<K, Arc<V>>>,
    hook: Option<SharedHook<K, V>>,
    notify: NotifyMode,
    capacity: usize,
}

/// Thread-safe LRU cache with an optional eviction hook.
///
/// Cloning the cache clones a handle; all clones share the same entries.
///
/// # Example
///
/// ```
/// use memocache::policy::lru::ConcurrentLruCache;
///
/// let cache: ConcurrentLruCache<String, u32> = ConcurrentLruCache::new(2);
/// cache.insert("a".to_string(), 1);
/// cache.insert("b".to_string(), 2);
/// cache.insert("c".to_string(), 3);
///
/// assert_eq!(cache.len(), 2);
/// assert!(cache.get(&"a".to_string()).is_none());
/// assert_eq!(cache.get(&"b".to_string()).as_deref(), Some(&2));
/// ```
pub struct ConcurrentLruCache<K, V> {
    inner: Arc<Shared<K, V>>,
}

impl<K, V> Clone for ConcurrentLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache without an eviction hook. `capacity == 0` is unbounded.
    pub fn new(capacity: usize) -> Self {
        Self::from_parts(LruCore::new(capacity), None, NotifyMode::Immediate)
    }

    /// Creates a cache whose hook runs under the lock
    /// ([`NotifyMode::Immediate`]).
    pub fn with_hook<H>(capacity: usize, hook: H) -> Self
    where
        H: EvictionHook<K, V> + 'static,
    {
        Self::from_parts(
            LruCore::new(capacity),
            Some(Arc::new(hook)),
            NotifyMode::Immediate,
        )
    }

    pub(crate) fn from_parts(
        core: LruCore<K, Arc<V>>,
        hook: Option<SharedHook<K, V>>,
        notify: NotifyMode,
    ) -> Self {
        Self {
            inner: Arc::new(Shared {
                capacity: core.capacity(),
                core: RwLock::new(core),
                hook,
                notify,
            }),
        }
    }

    /// Inserts or updates `key`, returning the replaced value on update.
    ///
    /// A new key may evict the least recently used entry; the hook sees it
    /// before this call returns.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.insert_arc(key, Arc::new(value))
    }

    /// Like [`insert`](Self::insert) for a value that is already shared.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let mut core = self.inner.core.write();
        let outcome = core.insert(key, value);
        match outcome {
            Insertion::Added => None,
            Insertion::Replaced(previous) => Some(previous),
            Insertion::Evicted { key, value } => {
                trace!(
                    len = core.len(),
                    capacity = core.capacity(),
                    "evicted least recently used entry"
                );
                self.notify_one(core, key, value, EvictionCause::Capacity);
                None
            },
        }
    }

    /// Looks up `key`, promoting it to most recently used on a hit.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut core = self.inner.core.write();
        core.get(key).cloned()
    }

    /// Looks up `key` without promoting it.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let core = self.inner.core.read();
        core.peek(key).cloned()
    }

    /// Removes `key`, reporting it to the hook as
    /// [`EvictionCause::Explicit`]. Absent keys are a no-op.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let mut core = self.inner.core.write();
        let (key, value) = core.remove(key)?;
        self.notify_one(core, key, Arc::clone(&value), EvictionCause::Explicit);
        Some(value)
    }

    /// Removes every entry, reporting each to the hook as
    /// [`EvictionCause::Cleared`] in unspecified order.
    ///
    /// Capacity and hook are kept.
    pub fn clear(&self) {
        let mut core = self.inner.core.write();
        let entries = core.len();

        match (self.inner.hook.as_deref(), self.inner.notify) {
            (None, _) => core.clear(),
            (Some(hook), NotifyMode::Immediate) => {
                for (key, value) in core.drain() {
                    hook.on_evict(&key, &value, EvictionCause::Cleared);
                }
            },
            (Some(hook), NotifyMode::Deferred) => {
                let removed: Vec<_> = core.drain().collect();
                drop(core);
                debug!(count = removed.len(), "flushing deferred eviction notifications");
                for (key, value) in removed {
                    hook.on_evict(&key, &value, EvictionCause::Cleared);
                }
            },
        }

        debug!(entries, "cache cleared");
    }

    /// Returns the cached value for `key`, computing and caching it on a miss.
    ///
    /// `compute` runs without holding the lock, so concurrent misses on the
    /// same key may each compute a value; the last insert wins.
    ///
    /// ```
    /// use memocache::policy::lru::ConcurrentLruCache;
    ///
    /// let cache = ConcurrentLruCache::new(16);
    /// let first = cache.get_or_insert_with("https://example.org/a".to_string(), || 42);
    /// let second = cache.get_or_insert_with("https://example.org/a".to_string(), || unreachable!());
    /// assert_eq!((*first, *second), (42, 42));
    /// ```
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = Arc::new(compute());
        self.insert_arc(key, Arc::clone(&value));
        value
    }

    /// Fallible [`get_or_insert_with`](Self::get_or_insert_with). Errors are
    /// returned as-is and nothing is cached.
    pub fn try_get_or_insert_with<F, E>(&self, key: K, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let value = Arc::new(compute()?);
        self.insert_arc(key, Arc::clone(&value));
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.inner.core.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.core.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Returns `true` if `key` is cached. Does not affect recency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.core.read().contains(key)
    }

    /// Keys ordered from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        let core = self.inner.core.read();
        core.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn notify_mode(&self) -> NotifyMode {
        self.inner.notify
    }

    /// Runs [`LruCore::check_invariants`] under the read lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.core.read().check_invariants()
    }

    fn notify_one(
        &self,
        guard: RwLockWriteGuard<'_, LruCore<K, Arc<V>>>,
        key: K,
        value: Arc<V>,
        cause: EvictionCause,
    ) {
        let Some(hook) = self.inner.hook.as_deref() else {
            return;
        };
        if self.inner.notify == NotifyMode::Deferred {
            drop(guard);
        }
        hook.on_evict(&key, &value, cause);
    }
}

#[cfg(feature = "metrics")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.inner.core.read().metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> ConcurrentCache for ConcurrentLruCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

impl<K, V> Default for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with [`DEFAULT_CAPACITY`](crate::builder::DEFAULT_CAPACITY).
    fn default() -> Self {
        Self::new(crate::builder::DEFAULT_CAPACITY)
    }
}

impl<K, V> fmt::Debug for ConcurrentLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.core.read();
        f.debug_struct("ConcurrentLruCache")
            .field("len", &core.index.len())
            .field("capacity", &self.inner.capacity)
            .field("notify", &self.inner.notify)
            .field("has_hook", &self.inner.hook.is_some())
            .finish()
    }
}
