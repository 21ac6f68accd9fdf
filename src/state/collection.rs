// Collection pager state.
// Tracks the current page of a CMS collection and drives page navigation.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::cache::CacheOptions;
use crate::cms::{
    APPLICATIONS, APPLICATIONS_PER_PAGE, CmsClient, PaginationResponse, Product, SMARTPHONES,
    SMARTPHONES_PER_PAGE, collection_endpoint,
};

use super::loading::LoadingState;

/// What a pager loads and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerConfig {
    /// Collection path, e.g. `/smartphones`.
    pub resource: String,
    pub initial_page: u32,
    pub limit: u32,
    /// `None` uses the client's catalog defaults.
    pub cache_options: Option<CacheOptions>,
}

impl PagerConfig {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            initial_page: 1,
            limit: 10,
            cache_options: None,
        }
    }

    pub fn smartphones() -> Self {
        Self {
            limit: SMARTPHONES_PER_PAGE,
            ..Self::new(SMARTPHONES)
        }
    }

    pub fn applications() -> Self {
        Self {
            limit: APPLICATIONS_PER_PAGE,
            ..Self::new(APPLICATIONS)
        }
    }

    pub fn with_initial_page(mut self, page: u32) -> Self {
        self.initial_page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_cache_options(mut self, options: CacheOptions) -> Self {
        self.cache_options = Some(options);
        self
    }
}

/// Paginated view over a CMS collection.
pub struct CollectionPager<T> {
    client: CmsClient,
    config: PagerConfig,
    page: u32,
    state: LoadingState,
    pagination: Option<PaginationResponse<T>>,
}

impl<T: DeserializeOwned> CollectionPager<T> {
    /// Create an idle pager; nothing is fetched until [`CollectionPager::load`].
    pub fn new(client: CmsClient, config: PagerConfig) -> Self {
        let page = config.initial_page.max(1);
        Self {
            client,
            config,
            page,
            state: LoadingState::Idle,
            pagination: None,
        }
    }

    /// Create a pager and load its initial page.
    pub async fn mount(client: CmsClient, config: PagerConfig) -> Self {
        let mut pager = Self::new(client, config);
        pager.load(pager.page).await;
        pager
    }

    /// Load `page`, treating 0 as 1. Failures land in
    /// [`CollectionPager::state`]; the last successful page stays available.
    pub async fn load(&mut self, page: u32) {
        let page = page.max(1);
        let options = self
            .config
            .cache_options
            .unwrap_or_else(|| self.client.product_options());
        self.state = LoadingState::Loading;

        match self
            .client
            .fetch_collection::<T>(
                &self.config.resource,
                page,
                self.config.limit,
                options,
            )
            .await
        {
            Ok(response) => {
                self.page = page;
                self.pagination = Some(response);
                self.state = LoadingState::Loaded;
            }
            Err(e) => {
                warn!(resource = %self.config.resource, page, error = %e, "collection load failed");
                self.state = LoadingState::Error(e.to_string());
            }
        }
    }

    /// Load page `n` if it is in range. Returns whether a load was issued.
    pub async fn go_to_page(&mut self, n: u32) -> bool {
        if n < 1 {
            return false;
        }
        if let Some(pagination) = &self.pagination {
            if n > pagination.total_pages {
                return false;
            }
        }
        self.load(n).await;
        true
    }

    pub async fn next_page(&mut self) -> bool {
        if !self.pagination.as_ref().is_some_and(|p| p.has_next_page) {
            return false;
        }
        self.go_to_page(self.page + 1).await
    }

    pub async fn prev_page(&mut self) -> bool {
        if !self.pagination.as_ref().is_some_and(|p| p.has_prev_page) {
            return false;
        }
        self.go_to_page(self.page - 1).await
    }

    /// Reload the current page, dropping its cache entry first when
    /// `force_bypass_cache` is set.
    pub async fn refresh(&mut self, force_bypass_cache: bool) {
        if force_bypass_cache {
            self.client.clear_cache(Some(&self.endpoint()));
        }
        self.load(self.page).await;
    }
}

impl<T> CollectionPager<T> {
    pub fn state(&self) -> &LoadingState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// Current page number (the last one that loaded successfully).
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.config.limit
    }

    pub fn items(&self) -> &[T] {
        self.pagination
            .as_ref()
            .map(|p| p.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn pagination(&self) -> Option<&PaginationResponse<T>> {
        self.pagination.as_ref()
    }

    /// Endpoint path for the current page.
    pub fn endpoint(&self) -> String {
        collection_endpoint(&self.config.resource, self.page, self.config.limit)
    }
}

/// Pager over smartphones, six per page.
pub async fn smartphones(client: CmsClient) -> CollectionPager<Product> {
    CollectionPager::mount(client, PagerConfig::smartphones()).await
}

/// Pager over applications, eight per page.
pub async fn applications(client: CmsClient) -> CollectionPager<Product> {
    CollectionPager::mount(client, PagerConfig::applications()).await
}
