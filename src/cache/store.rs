// In-memory cache store for CMS responses.
// Holds JSON payloads keyed by request URL with the time they were fetched.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;

/// Default max-age when a caller does not override it: 5 minutes.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// A cached CMS response with the time it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The decoded response body.
    pub data: Value,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Time elapsed since the entry was stored.
    pub fn age(&self) -> Duration {
        // A timestamp in the future (clock step) counts as brand new.
        Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Fresh entries are strictly younger than `max_age`.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.age() < max_age
    }
}

/// Per-call cache policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// How long an entry is served without touching the network.
    pub max_age: Duration,
    /// Serve stale entries immediately and refresh them in the background.
    pub revalidate: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            revalidate: true,
        }
    }
}

impl CacheOptions {
    pub fn new(max_age: Duration, revalidate: bool) -> Self {
        Self {
            max_age,
            revalidate,
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_revalidate(mut self, revalidate: bool) -> Self {
        self.revalidate = revalidate;
        self
    }
}

/// Process-wide response cache shared by every accessor.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry regardless of its age.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().get(key).cloned()
    }

    /// Store `data` under `key`, stamped with the current time.
    pub fn set(&self, key: impl Into<String>, data: Value) {
        self.insert(key.into(), CacheEntry::new(data));
    }

    /// Remove one entry, or every entry when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        let mut entries = self.entries.write();
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Insert a prepared entry, keeping its timestamp.
    pub(crate) fn insert(&self, key: String, entry: CacheEntry) {
        self.entries.write().insert(key, entry);
    }
}
