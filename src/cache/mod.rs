// Cache module for CMS responses.
// Keeps decoded API payloads in memory with a max-age policy.

pub mod store;

pub use store::{CacheEntry, CacheOptions, CacheStore, DEFAULT_MAX_AGE};
