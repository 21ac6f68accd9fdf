// Client configuration.
// Merges built-in defaults, an optional JSON config file, and environment overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::cache::CacheOptions;
use crate::error::{CmsError, Result};

pub const DEFAULT_API_URL: &str = "https://bertini-backend.vercel.app";

pub const API_URL_ENV: &str = "BERTINI_API_URL";
pub const CACHE_MAX_AGE_ENV: &str = "BERTINI_CACHE_MAX_AGE_MS";
pub const CACHE_REVALIDATE_ENV: &str = "BERTINI_CACHE_REVALIDATE";

/// Path to the optional config file (e.g. ~/.config/bertini/config.json).
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bertini").map(|dirs| dirs.config_dir().join("config.json"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CMS base URL, without the `/api` suffix.
    pub api_url: String,
    /// Default cache max-age in milliseconds.
    pub cache_max_age_ms: u64,
    /// Whether stale entries are served while revalidating.
    pub cache_revalidate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cache_max_age_ms: 5 * 60 * 1000,
            cache_revalidate: true,
        }
    }
}

impl Config {
    /// Load from the config file (if any) and the process environment.
    pub fn load() -> Result<Self> {
        let base = match config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read a JSON config file; missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validated()
    }

    /// Apply overrides looked up by environment variable name.
    ///
    /// Values that fail to parse are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(max_age) = lookup(CACHE_MAX_AGE_ENV).and_then(|v| v.trim().parse().ok()) {
            self.cache_max_age_ms = max_age;
        }
        if let Some(revalidate) = lookup(CACHE_REVALIDATE_ENV).and_then(|v| parse_bool(&v)) {
            self.cache_revalidate = revalidate;
        }
        self.validated()
    }

    /// Check the API URL and strip any trailing slash.
    fn validated(mut self) -> Result<Self> {
        let url = Url::parse(self.api_url.trim())
            .map_err(|e| CmsError::Config(format!("invalid api_url {:?}: {}", self.api_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CmsError::Config(format!(
                "api_url must be http or https, got {}",
                url.scheme()
            )));
        }
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Default cache policy described by this config.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions::new(
            Duration::from_millis(self.cache_max_age_ms),
            self.cache_revalidate,
        )
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
