//! TTL Cache - A lightweight in-memory key-value cache
//!
//! Stores values of a single generic type under string keys, each entry
//! annotated with an absolute expiration instant. Expired entries are reaped
//! lazily by retrieval operations rather than by a background task, and a
//! single reader-writer lock makes the cache safe for unrestricted concurrent
//! use.
//!
//! # Example
//!
//! ```
//! use chrono::Duration;
//! use ttl_cache::TtlCache;
//!
//! let cache: TtlCache<i32> = TtlCache::new(Duration::minutes(1));
//! cache.set("one".to_string(), 1, None);
//! cache.set("two".to_string(), 2, Some(Duration::hours(1)));
//!
//! assert_eq!(cache.get("one"), Some(1));
//! assert_eq!(cache.get("two"), Some(2));
//! ```

pub mod cache;

pub use cache::TtlCache;
