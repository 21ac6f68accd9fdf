// Global content view state.
// Loads one page global and exposes data, loading state, and refetch.

use tracing::warn;

use crate::cache::CacheOptions;
use crate::cms::{CmsClient, GlobalContent, global_endpoint};

use super::loading::LoadingState;

/// View over a single CMS global, as rendered by one page.
pub struct GlobalView {
    client: CmsClient,
    slug: String,
    options: Option<CacheOptions>,
    state: LoadingState,
    data: Option<GlobalContent>,
}

impl GlobalView {
    pub fn new(client: CmsClient, slug: impl Into<String>, options: Option<CacheOptions>) -> Self {
        Self {
            client,
            slug: slug.into(),
            options,
            state: LoadingState::Idle,
            data: None,
        }
    }

    /// Create the view and load it once.
    pub async fn mount(
        client: CmsClient,
        slug: impl Into<String>,
        options: Option<CacheOptions>,
    ) -> Self {
        let mut view = Self::new(client, slug, options);
        view.load().await;
        view
    }

    pub async fn load(&mut self) {
        self.state = LoadingState::Loading;
        match self.client.fetch_global(&self.slug, self.options).await {
            Ok(content) => {
                self.data = Some(content);
                self.state = LoadingState::Loaded;
            }
            Err(e) => {
                warn!(slug = %self.slug, error = %e, "global load failed");
                self.state = LoadingState::Error(e.to_string());
            }
        }
    }

    /// Reload, clearing the cached global first when `force_refresh` is set.
    pub async fn refetch(&mut self, force_refresh: bool) {
        if force_refresh {
            self.client.clear_cache(Some(&global_endpoint(&self.slug)));
        }
        self.load().await;
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn data(&self) -> Option<&GlobalContent> {
        self.data.as_ref()
    }

    pub fn state(&self) -> &LoadingState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }
}
