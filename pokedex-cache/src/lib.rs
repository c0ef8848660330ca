//! Time-expiring response cache for the Pokedex.
//!
//! Thread-safe in-memory map from string key to byte payload. A background
//! reaper thread removes entries older than the cache TTL.

mod cache;
mod reaper;

pub use cache::{CacheConfig, CacheStats, ExpiringCache};
