//! Cache Store Module
//!
//! The cache itself: a string-keyed map guarded by a single reader-writer
//! lock, with per-entry TTL expiration reaped lazily on read paths.

use std::collections::{hash_map, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::cache::Entry;

// == TTL Cache ==
/// Thread-safe key-value cache where every entry expires after a TTL.
///
/// Values of a single type `T` are stored under string keys, each annotated
/// with an absolute expiration instant computed at insertion time. No
/// background task removes expired entries; they are reaped lazily by the
/// next retrieval operation that observes them ([`get`](TtlCache::get),
/// [`items`](TtlCache::items), [`values`](TtlCache::values)) or by an
/// explicit [`purge`](TtlCache::purge).
///
/// The whole map sits behind one coarse-grained `RwLock`, so a cache shared
/// across threads (e.g. behind an `Arc`) needs no external synchronization.
#[derive(Debug)]
pub struct TtlCache<T> {
    /// Key-value storage with per-entry expiration
    entries: RwLock<HashMap<String, Entry<T>>>,
    /// TTL applied when an operation supplies no positive override
    default_ttl: Duration,
}

impl<T> TtlCache<T> {
    // == Constructor ==
    /// Creates an empty cache whose entries live for `default_ttl` unless an
    /// operation overrides it.
    ///
    /// `default_ttl` is not validated: a zero or negative duration is
    /// accepted and simply means entries expire immediately unless a
    /// positive per-call TTL is given.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    // == Add ==
    /// Inserts `value` under `key` only if no entry is already stored there.
    ///
    /// Returns `true` if the value was inserted, `false` if an existing entry
    /// blocked it. The presence check deliberately does not consult
    /// expiration: an entry that has expired but has not been reaped yet
    /// still counts as present and blocks the insert until a retrieval
    /// operation reaps it.
    ///
    /// # Arguments
    /// * `key` - The key to insert under
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL; used when strictly positive, otherwise the
    ///   default TTL applies
    pub fn add(&self, key: String, value: T, ttl: Option<Duration>) -> bool {
        let entry = Entry::new(value, self.effective_ttl(ttl));

        match self.write().entry(key) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, inserting or overwriting unconditionally.
    ///
    /// The entry's expiration instant is recomputed from now, whether or not
    /// a previous entry existed or had expired.
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL; used when strictly positive, otherwise the
    ///   default TTL applies
    pub fn set(&self, key: String, value: T, ttl: Option<Duration>) {
        let entry = Entry::new(value, self.effective_ttl(ttl));
        self.write().insert(key, entry);
    }

    // == Delete ==
    /// Removes the entry for `key`. No-op if the key is absent.
    pub fn delete(&self, key: &str) {
        self.write().remove(key);
    }

    // == Keys ==
    /// Returns all keys currently stored, in unspecified order.
    ///
    /// Unlike [`items`](TtlCache::items) and [`values`](TtlCache::values),
    /// this performs no expiry check: keys whose entries have expired but
    /// have not been reaped yet are included. The result can therefore be
    /// longer than `items()` until a retrieval or purge runs.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    // == Purge ==
    /// Removes every expired entry and returns the number removed.
    ///
    /// Live entries are untouched. Like the lazy reaps on retrieval, the
    /// removal verifies each entry against the expiration instant observed
    /// during the scan, so a concurrent write that refreshed a key is never
    /// discarded (and is not counted).
    pub fn purge(&self) -> usize {
        let stale = self.stale_entries();
        if stale.is_empty() {
            return 0;
        }

        let mut removed = 0;
        {
            let mut entries = self.write();
            for (key, observed) in stale {
                if entries.get(&key).is_some_and(|e| e.expires_at == observed) {
                    entries.remove(&key);
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            debug!("purge: removed {} expired entries", removed);
        }
        removed
    }

    // == Length ==
    /// Returns the number of entries currently stored.
    ///
    /// Counts expired-but-unreaped entries too, mirroring
    /// [`keys`](TtlCache::keys).
    pub fn len(&self) -> usize {
        self.read().len()
    }

    // == Is Empty ==
    /// Returns `true` if no entries are stored, expired or not.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // == Internal Helpers ==
    /// Resolves the TTL for an insert: the override wins when strictly
    /// positive, otherwise the cache default applies.
    fn effective_ttl(&self, ttl: Option<Duration>) -> Duration {
        match ttl {
            Some(t) if t > Duration::zero() => t,
            _ => self.default_ttl,
        }
    }

    /// Scans under the read lock for entries whose TTL has elapsed,
    /// recording the expiration instant observed for each so the later
    /// removal can verify nothing overwrote the key in between.
    fn stale_entries(&self) -> Vec<(String, DateTime<Utc>)> {
        self.read()
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, entry)| (key.clone(), entry.expires_at))
            .collect()
    }

    /// Removes `key` only if it still holds the entry whose expiration
    /// instant was observed under the read lock. A concurrent `set` that
    /// refreshed the key in the meantime wins and the reap backs off.
    fn reap(&self, key: &str, observed: DateTime<Utc>) {
        let mut entries = self.write();
        if entries.get(key).is_some_and(|e| e.expires_at == observed) {
            entries.remove(key);
            debug!("reaped expired entry for key {:?}", key);
        }
    }

    /// Mutations are single insert/remove calls that cannot leave the map
    /// half-updated, so a poisoned lock is recovered rather than propagated.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry<T>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry<T>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> TtlCache<T> {
    // == Get ==
    /// Retrieves the value for `key`, or `None` if the key is absent or its
    /// entry has expired.
    ///
    /// An expired entry is reaped as a side effect. The read lock is released
    /// before the reap takes the write lock; the reap double-checks the
    /// observed expiration instant, so a concurrent fresh write for the same
    /// key is never clobbered.
    pub fn get(&self, key: &str) -> Option<T> {
        let observed = {
            let entries = self.read();
            let entry = entries.get(key)?;
            if !entry.is_expired() {
                return Some(entry.value.clone());
            }
            entry.expires_at
        };

        self.reap(key, observed);
        None
    }

    // == Items ==
    /// Returns a snapshot of all live entries as a key-to-value map.
    ///
    /// Every expired entry discovered during the scan is reaped as a side
    /// effect and excluded from the result.
    pub fn items(&self) -> HashMap<String, T> {
        let (live, stale) = {
            let entries = self.read();
            let mut live = HashMap::with_capacity(entries.len());
            let mut stale = Vec::new();
            for (key, entry) in entries.iter() {
                if entry.is_expired() {
                    stale.push((key.clone(), entry.expires_at));
                } else {
                    live.insert(key.clone(), entry.value.clone());
                }
            }
            (live, stale)
        };

        for (key, observed) in stale {
            self.reap(&key, observed);
        }
        live
    }

    // == Values ==
    /// Returns all live values, in unspecified order.
    ///
    /// Same expiry-and-reap treatment as [`items`](TtlCache::items).
    pub fn values(&self) -> Vec<T> {
        let (live, stale) = {
            let entries = self.read();
            let mut live = Vec::with_capacity(entries.len());
            let mut stale = Vec::new();
            for (key, entry) in entries.iter() {
                if entry.is_expired() {
                    stale.push((key.clone(), entry.expires_at));
                } else {
                    live.push(entry.value.clone());
                }
            }
            (live, stale)
        };

        for (key, observed) in stale {
            self.reap(&key, observed);
        }
        live
    }
}
