// Cache-aware CMS client.
// Serves fresh entries from memory, stale ones while revalidating, and fetches otherwise.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{CacheOptions, CacheStore};
use crate::config::Config;
use crate::error::{CmsError, Result};

use super::transport::{ReqwestTransport, Transport};

/// Client for the headless CMS with an in-memory response cache.
///
/// Cloning is cheap; clones share the transport, the cache, and the set of
/// in-flight background refreshes.
#[derive(Clone)]
pub struct CmsClient {
    api_url: String,
    transport: Arc<dyn Transport>,
    cache: Arc<CacheStore>,
    defaults: CacheOptions,
    revalidating: Arc<Mutex<HashSet<String>>>,
}

impl CmsClient {
    /// Create a client for `api_url` (without the `/api` suffix).
    pub fn new(
        api_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        cache: Arc<CacheStore>,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            api_url,
            transport,
            cache,
            defaults: CacheOptions::default(),
            revalidating: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Build a client with a `reqwest` transport and a fresh cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self::new(&config.api_url, transport, Arc::new(CacheStore::new()))
            .with_defaults(config.cache_options()))
    }

    /// Replace the base options; accessor defaults are derived from these.
    pub fn with_defaults(mut self, defaults: CacheOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn defaults(&self) -> CacheOptions {
        self.defaults
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Cache key for an endpoint such as `/globals/homepage`.
    ///
    /// Query strings are taken verbatim, so parameter order matters.
    pub fn cache_key(&self, endpoint: &str) -> String {
        format!("{}/api{}", self.api_url, endpoint)
    }

    /// Drop the cached entry for `endpoint`, or the whole cache.
    pub fn clear_cache(&self, endpoint: Option<&str>) {
        match endpoint {
            Some(endpoint) => {
                self.cache.clear(Some(&self.cache_key(endpoint)));
                debug!(endpoint, "cleared cache entry");
            }
            None => {
                self.cache.clear(None);
                debug!("cleared entire cache");
            }
        }
    }

    /// Fetch with the client's default options.
    pub async fn fetch_default(&self, endpoint: &str) -> Result<Value> {
        self.fetch(endpoint, self.defaults).await
    }

    /// Fetch `endpoint` through the cache.
    ///
    /// A fresh entry is returned without a request. A stale entry is returned
    /// as-is when `options.revalidate` is set, and a detached task refreshes
    /// it; that task's errors are only logged. Anything else blocks on the
    /// network and propagates failures.
    pub async fn fetch(&self, endpoint: &str, options: CacheOptions) -> Result<Value> {
        let key = self.cache_key(endpoint);

        if let Some(entry) = self.cache.get(&key) {
            if entry.is_fresh(options.max_age) {
                debug!(endpoint, "cache hit");
                return Ok(entry.data);
            }

            if options.revalidate {
                debug!(endpoint, "serving stale data while revalidating");
                self.spawn_revalidation(key, endpoint.to_string());
                return Ok(entry.data);
            }
        }

        self.fetch_and_cache(&key, endpoint).await
    }

    /// Request `endpoint`, store the decoded body under `key`, and return it.
    pub async fn fetch_and_cache(&self, key: &str, endpoint: &str) -> Result<Value> {
        info!(endpoint, "fetching fresh data");
        let response = self.transport.get(key).await?;

        if !response.is_success() {
            return Err(CmsError::RequestFailed {
                status: response.status,
                endpoint: endpoint.to_string(),
            });
        }

        let data: Value = serde_json::from_str(&response.body)?;
        self.cache.set(key, data.clone());
        Ok(data)
    }

    /// Start a background refresh unless one is already running for `key`.
    fn spawn_revalidation(&self, key: String, endpoint: String) {
        if !self.revalidating.lock().insert(key.clone()) {
            debug!(endpoint = %endpoint, "revalidation already in flight");
            return;
        }

        let guard = InFlight {
            keys: Arc::clone(&self.revalidating),
            key,
        };
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.fetch_and_cache(&guard.key, &endpoint).await {
                warn!(endpoint = %endpoint, error = %e, "background revalidation failed");
            }
            drop(guard);
        });
    }
}

/// Marks a key as being revalidated until dropped, including when the
/// refresh task panics or is aborted.
struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.keys.lock().remove(&self.key);
    }
}

impl std::fmt::Debug for CmsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsClient")
            .field("api_url", &self.api_url)
            .field("defaults", &self.defaults)
            .field("cached_entries", &self.cache.len())
            .finish()
    }
}
