//! Eviction policies.
//!
//! - [`lru`]: least recently used, with a thread-safe wrapper and eviction hook.

pub mod lru;
