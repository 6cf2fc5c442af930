//! memocache: a bounded, thread-safe LRU cache with eviction notifications,
//! built for memoizing expensive fetches.
//!
//! Start with [`policy::lru::ConcurrentLruCache`] or [`builder::LruCacheBuilder`].

pub mod builder;
pub mod ds;
pub mod error;
pub mod hook;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
