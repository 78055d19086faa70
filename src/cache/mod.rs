//! Cache Module
//!
//! In-memory API response cache with per-entry TTL, namespace invalidation
//! and a stale-on-error fetch wrapper.

mod clock;
mod entry;
pub mod keys;
mod memoize;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use memoize::{fetch_with_cache, shared, with_cache, Memoized, SharedCache};
pub use stats::CacheStats;
pub use store::{ApiCache, Lookup};

// == Public Constants ==
/// Default entry TTL in milliseconds (5 minutes)
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;
