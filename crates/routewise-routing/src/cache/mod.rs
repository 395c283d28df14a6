//! Response caching keyed by normalized request text.
//!
//! Near-duplicate requests (differing in case, spacing, or punctuation) share
//! an entry, so repeated questions skip selection and dispatch entirely.

/// Background expiry sweep
pub mod cleanup;
/// Key normalization and hashing
pub mod key;
/// Cache storage implementation
pub mod storage;

pub use cleanup::CleanupHandle;
pub use key::{CacheKey, fingerprint_hash, normalize};
pub use storage::{CacheEntry, CacheStats, PreloadEntry, ResponseCache};
