// Bertini storefront data client.
// Cached access to the headless CMS that backs the marketing and catalog pages.

pub mod cache;
pub mod cms;
pub mod config;
pub mod error;
pub mod prefetch;
pub mod state;

pub use cache::{CacheEntry, CacheOptions, CacheStore};
pub use cms::CmsClient;
pub use config::Config;
pub use error::{CmsError, Result};
pub use prefetch::{PrefetchReport, PrefetchTarget, Prefetcher};
