// CMS endpoint accessors.
// Typed wrappers over the cached fetch for globals, collections, and documents.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::cache::CacheOptions;
use crate::error::Result;

use super::client::CmsClient;
use super::fallback::placeholder_products;
use super::types::{GlobalContent, PaginationResponse, Product};

/// Globals change less often than the catalog and keep this many times the
/// client's base max-age (10 minutes against the default 5).
pub const GLOBALS_MAX_AGE_FACTOR: u32 = 2;

pub const SMARTPHONES: &str = "/smartphones";
pub const APPLICATIONS: &str = "/applications";
pub const SMARTPHONES_PER_PAGE: u32 = 6;
pub const APPLICATIONS_PER_PAGE: u32 = 8;

/// Slugs of the page globals the site renders.
pub const PAGE_GLOBALS: [&str; 6] = [
    "homepage",
    "about",
    "products",
    "contact",
    "reparateur",
    "bertiny",
];

/// Endpoint path for a global.
pub fn global_endpoint(slug: &str) -> String {
    format!("/globals/{}", slug)
}

/// Endpoint path for one page of a collection.
pub fn collection_endpoint(resource: &str, page: u32, limit: u32) -> String {
    format!("{}?page={}&limit={}", resource, page, limit)
}

impl CmsClient {
    /// Default options for globals, derived from the client's defaults.
    pub fn global_options(&self) -> CacheOptions {
        let defaults = self.defaults();
        defaults.with_max_age(defaults.max_age.saturating_mul(GLOBALS_MAX_AGE_FACTOR))
    }

    /// Default options for catalog collections and documents.
    pub fn product_options(&self) -> CacheOptions {
        self.defaults()
    }

    /// Fetch a global by slug.
    pub async fn fetch_global(
        &self,
        slug: &str,
        options: Option<CacheOptions>,
    ) -> Result<GlobalContent> {
        let value = self
            .fetch(&global_endpoint(slug), options.unwrap_or_else(|| self.global_options()))
            .await?;
        GlobalContent::from_value(slug, value)
    }

    /// Fetch a global and decode it into a page-specific type.
    pub async fn fetch_global_as<T: DeserializeOwned>(
        &self,
        slug: &str,
        options: Option<CacheOptions>,
    ) -> Result<T> {
        self.fetch_global(slug, options).await?.deserialize()
    }

    pub async fn fetch_homepage(&self, options: Option<CacheOptions>) -> Result<GlobalContent> {
        self.fetch_global("homepage", options).await
    }

    pub async fn fetch_about_page(&self, options: Option<CacheOptions>) -> Result<GlobalContent> {
        self.fetch_global("about", options).await
    }

    pub async fn fetch_products_page(
        &self,
        options: Option<CacheOptions>,
    ) -> Result<GlobalContent> {
        self.fetch_global("products", options).await
    }

    pub async fn fetch_contact_page(&self, options: Option<CacheOptions>) -> Result<GlobalContent> {
        self.fetch_global("contact", options).await
    }

    pub async fn fetch_reparateur_page(
        &self,
        options: Option<CacheOptions>,
    ) -> Result<GlobalContent> {
        self.fetch_global("reparateur", options).await
    }

    pub async fn fetch_bertiny_page(&self, options: Option<CacheOptions>) -> Result<GlobalContent> {
        self.fetch_global("bertiny", options).await
    }

    /// Fetch one page of a collection.
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        resource: &str,
        page: u32,
        limit: u32,
        options: CacheOptions,
    ) -> Result<PaginationResponse<T>> {
        let endpoint = collection_endpoint(resource, page, limit);
        let value = self.fetch(&endpoint, options).await?;
        PaginationResponse::from_value(&endpoint, value)
    }

    /// Fetch a page of smartphones, six per page.
    pub async fn fetch_smartphones(
        &self,
        page: u32,
        options: Option<CacheOptions>,
    ) -> Result<PaginationResponse<Product>> {
        self.fetch_collection(
            SMARTPHONES,
            page,
            SMARTPHONES_PER_PAGE,
            options.unwrap_or_else(|| self.product_options()),
        )
        .await
    }

    /// Fetch a page of applications, eight per page.
    pub async fn fetch_applications(
        &self,
        page: u32,
        options: Option<CacheOptions>,
    ) -> Result<PaginationResponse<Product>> {
        self.fetch_collection(
            APPLICATIONS,
            page,
            APPLICATIONS_PER_PAGE,
            options.unwrap_or_else(|| self.product_options()),
        )
        .await
    }

    /// Fetch a single document of a collection by id.
    pub async fn fetch_document<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
        options: CacheOptions,
    ) -> Result<T> {
        let value = self.fetch(&format!("{}/{}", resource, id), options).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch one smartphone by id.
    pub async fn fetch_product_by_id(
        &self,
        id: &str,
        options: Option<CacheOptions>,
    ) -> Result<Product> {
        self.fetch_document(SMARTPHONES, id, options.unwrap_or_else(|| self.product_options()))
            .await
    }

    /// First `count` products of a collection, or placeholders on failure.
    pub async fn fetch_featured(&self, resource: &str, count: u32) -> Vec<Product> {
        let take = usize::try_from(count).unwrap_or(usize::MAX);
        match self
            .fetch_collection::<Product>(resource, 1, count, self.product_options())
            .await
        {
            Ok(page) => page.items.into_iter().take(take).collect(),
            Err(e) => {
                warn!(resource, error = %e, "using placeholder products");
                placeholder_products(resource)
                    .into_iter()
                    .take(take)
                    .collect()
            }
        }
    }
}
