pub use crate::builder::{CacheConfig, LruCacheBuilder, DEFAULT_CAPACITY};
pub use crate::ds::{IntrusiveList, SlotArena, SlotId};
pub use crate::error::InvariantError;
pub use crate::hook::{EvictionCause, EvictionHook, NotifyMode, SharedHook};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LruMetricsSnapshot;
pub use crate::policy::lru::{ConcurrentLruCache, Insertion, LruCore};
pub use crate::traits::{ConcurrentCache, CoreCache, MutableCache};
