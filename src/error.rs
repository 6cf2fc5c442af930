//! Error types for memocache.
//!
//! Cache operations are total and never return errors. The only error type is
//! [`InvariantError`], produced by the invariant checkers
//! ([`LruCore::check_invariants`](crate::policy::lru::LruCore::check_invariants)
//! and [`IntrusiveList::check_links`](crate::ds::IntrusiveList::check_links)).
//! A violation means the cache itself is broken, so callers inside the crate
//! escalate it to a panic rather than handling it.
//!
//! ```
//! use memocache::policy::lru::LruCore;
//!
//! let mut cache: LruCore<&str, u32> = LruCore::new(2);
//! cache.insert("a", 1);
//! assert!(cache.check_invariants().is_ok());
//! ```

use std::fmt;

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
