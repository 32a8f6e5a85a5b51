//! Cache Module
//!
//! Provides a generic in-memory key-value cache with per-entry TTL expiration.

mod entry;
mod store;


pub(crate) use entry::Entry;

// Re-export public types
pub use store::TtlCache;
