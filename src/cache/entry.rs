//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// A single cache entry: the stored value plus its absolute expiration instant.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    /// The stored value
    pub value: T,
    /// Absolute expiration instant (UTC), computed once at insertion
    pub expires_at: DateTime<Utc>,
}

impl<T> Entry<T> {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` from now.
    ///
    /// The expiration instant is computed eagerly as `now + ttl` in UTC wall
    /// clock time. A non-positive `ttl` produces an instant at or before now,
    /// so the entry is expired from birth. Overflow saturates to the maximum
    /// representable timestamp instead of panicking.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - How long the entry should live
    pub fn new(value: T, ttl: Duration) -> Self {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks whether the entry's TTL has elapsed.
    ///
    /// Boundary condition: an entry is expired only when the current time is
    /// strictly past `expires_at`. An entry observed exactly at its
    /// expiration instant is still live.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
