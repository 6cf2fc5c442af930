//! Eviction notifications.
//!
//! An [`EvictionHook`] is called once for every entry that leaves a
//! [`ConcurrentLruCache`](crate::policy::lru::ConcurrentLruCache): capacity
//! eviction, explicit removal, or bulk clear. Overwriting a value in place by
//! inserting the same key again is not a removal and is never reported.
//!
//! Any `Fn(&K, &V, EvictionCause) + Send + Sync` closure is a hook:
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use memocache::hook::EvictionCause;
//! use memocache::policy::lru::ConcurrentLruCache;
//!
//! let evicted = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&evicted);
//! let cache = ConcurrentLruCache::with_hook(1, move |_: &u32, _: &u32, cause: EvictionCause| {
//!     assert_eq!(cause, EvictionCause::Capacity);
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! cache.insert(1, 10);
//! cache.insert(2, 20);
//! assert_eq!(evicted.load(Ordering::Relaxed), 1);
//! ```
//!
//! ## Re-entrancy
//!
//! With [`NotifyMode::Immediate`] the hook runs while the cache's write lock
//! is held. It must not call any method on the same cache; the lock is not
//! re-entrant and the calling thread deadlocks. [`NotifyMode::Deferred`]
//! queues the removed entries and runs the hook after the lock is released,
//! which lifts that restriction at the cost of the hook observing the cache
//! after the operation has completed.

use std::fmt;
use std::sync::Arc;

/// Why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionCause {
    /// Least-recently-used entry pushed out by an insert over capacity.
    Capacity,
    /// Removed by an explicit `remove` call.
    Explicit,
    /// Dropped by `clear`.
    Cleared,
}

impl fmt::Display for EvictionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EvictionCause::Capacity => "capacity",
            EvictionCause::Explicit => "explicit",
            EvictionCause::Cleared => "cleared",
        })
    }
}

/// Callback invoked for each entry that leaves the cache.
pub trait EvictionHook<K, V>: Send + Sync {
    fn on_evict(&self, key: &K, value: &V, cause: EvictionCause);
}

impl<K, V, F> EvictionHook<K, V> for F
where
    F: Fn(&K, &V, EvictionCause) + Send + Sync,
{
    fn on_evict(&self, key: &K, value: &V, cause: EvictionCause) {
        self(key, value, cause)
    }
}

/// Shared, type-erased hook as stored by caches and builders.
pub type SharedHook<K, V> = Arc<dyn EvictionHook<K, V>>;

/// When the eviction hook runs relative to the cache lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyMode {
    /// Run the hook synchronously while the write lock is held, before the
    /// operation returns. The hook must not touch the cache.
    #[default]
    Immediate,
    /// Queue removed entries and run the hook after the lock is released,
    /// still before the operation returns to its caller.
    Deferred,
}
