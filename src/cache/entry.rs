//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// Represents a single cache entry with payload and expiry metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Creation timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Milliseconds until the entry is considered stale
    pub ttl: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now_ms`.
    pub fn new(data: T, now_ms: u64, ttl: u64) -> Self {
        Self {
            data,
            timestamp: now_ms,
            ttl,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was created.
    ///
    /// Saturates at zero if the clock moved backwards.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp)
    }

    // == Is Valid ==
    /// An entry is valid while its age does not exceed its ttl.
    ///
    /// The boundary is inclusive: at exactly `timestamp + ttl` the entry is
    /// still served, one millisecond later it is stale.
    pub fn is_valid(&self, now_ms: u64) -> bool {
        self.age_ms(now_ms) <= self.ttl
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        !self.is_valid(now_ms)
    }

    // == Time To Live ==
    /// Returns remaining freshness in milliseconds, zero once stale.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.ttl.saturating_sub(self.age_ms(now_ms))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value", 1_000, 60_000);

        assert_eq!(entry.data, "test_value");
        assert_eq!(entry.timestamp, 1_000);
        assert_eq!(entry.ttl, 60_000);
        assert!(entry.is_valid(1_000));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", 0, 1_000);

        assert!(entry.is_valid(999));
        assert!(entry.is_expired(1_100));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", 5_000, 1_000);

        // Age equal to ttl is still valid
        assert!(entry.is_valid(6_000), "Entry should be valid at boundary");
        assert!(entry.is_expired(6_001), "Entry should expire just past boundary");
    }

    #[test]
    fn test_zero_ttl_valid_only_at_creation() {
        let entry = CacheEntry::new(1u8, 42, 0);
        assert!(entry.is_valid(42));
        assert!(entry.is_expired(43));
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new("test_value", 0, 10_000);

        assert_eq!(entry.ttl_remaining_ms(1_000), 9_000);
        assert_eq!(entry.ttl_remaining_ms(20_000), 0);
    }

    #[test]
    fn test_clock_moving_backwards() {
        let entry = CacheEntry::new("test_value", 10_000, 100);

        assert_eq!(entry.age_ms(5_000), 0);
        assert!(entry.is_valid(5_000));
    }
}
