//! Cache construction and configuration.
//!
//! [`CacheConfig`] holds the plain settings (capacity, notification mode,
//! preallocation) and can be stored or passed around independently of key and
//! value types. [`LruCacheBuilder`] adds the typed part, the eviction hook, and
//! builds a [`ConcurrentLruCache`].
//!
//! ## Example
//!
//! ```rust
//! use memocache::builder::LruCacheBuilder;
//! use memocache::hook::{EvictionCause, NotifyMode};
//!
//! let cache = LruCacheBuilder::new(100)
//!     .notify_mode(NotifyMode::Deferred)
//!     .eviction_hook(|url: &String, _: &Vec<u8>, cause: EvictionCause| {
//!         println!("dropped {url} ({cause})");
//!     })
//!     .build();
//!
//! cache.insert("https://example.org/".to_string(), b"<html/>".to_vec());
//! assert_eq!(cache.len(), 1);
//! assert_eq!(cache.capacity(), 100);
//! ```

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::hook::{EvictionHook, NotifyMode, SharedHook};
use crate::policy::lru::{ConcurrentLruCache, LruCore};

/// Capacity used by [`CacheConfig::default`] and `ConcurrentLruCache::default`.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Untyped cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries; 0 means unbounded.
    pub capacity: usize,
    /// When the eviction hook runs relative to the cache lock.
    pub notify: NotifyMode,
    /// Reserve storage for `capacity` entries up front.
    pub prealloc: bool,
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Builds a single-threaded core with these settings.
    ///
    /// `notify` is ignored; the core has no hook.
    pub fn build_core<K, V>(&self) -> LruCore<K, V>
    where
        K: Eq + Hash + Clone,
    {
        if self.prealloc {
            LruCore::preallocated(self.capacity)
        } else {
            LruCore::new(self.capacity)
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            notify: NotifyMode::Immediate,
            prealloc: false,
        }
    }
}

/// Builder for [`ConcurrentLruCache`].
pub struct LruCacheBuilder<K, V> {
    config: CacheConfig,
    hook: Option<SharedHook<K, V>>,
    _types: PhantomData<fn(K, V)>,
}

impl<K, V> LruCacheBuilder<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Starts a builder for a cache holding at most `capacity` entries
    /// (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self::from_config(CacheConfig::new(capacity))
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            hook: None,
            _types: PhantomData,
        }
    }

    /// Sets the eviction hook, replacing any previous one.
    pub fn eviction_hook<H>(self, hook: H) -> Self
    where
        H: EvictionHook<K, V> + 'static,
    {
        self.shared_hook(Arc::new(hook))
    }

    /// Sets a hook that is already shared, e.g. with another cache.
    pub fn shared_hook(mut self, hook: SharedHook<K, V>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn notify_mode(mut self, notify: NotifyMode) -> Self {
        self.config.notify = notify;
        self
    }

    pub fn prealloc(mut self, prealloc: bool) -> Self {
        self.config.prealloc = prealloc;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn build(self) -> ConcurrentLruCache<K, V> {
        ConcurrentLruCache::from_parts(self.config.build_core(), self.hook, self.config.notify)
    }
}

impl<K, V> fmt::Debug for LruCacheBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheBuilder")
            .field("config", &self.config)
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}
