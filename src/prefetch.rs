// Cache warm-up at startup.
// Fetches page globals and first collection pages concurrently, absorbing failures.

use futures::future::join_all;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cms::{
    APPLICATIONS, APPLICATIONS_PER_PAGE, CmsClient, PAGE_GLOBALS, SMARTPHONES,
    SMARTPHONES_PER_PAGE, collection_endpoint, global_endpoint,
};
use crate::error::Result;

/// Something to load into the cache ahead of time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefetchTarget {
    Global(String),
    Collection {
        resource: String,
        page: u32,
        limit: u32,
    },
}

impl PrefetchTarget {
    pub fn global(slug: impl Into<String>) -> Self {
        PrefetchTarget::Global(slug.into())
    }

    pub fn collection(resource: impl Into<String>, page: u32, limit: u32) -> Self {
        PrefetchTarget::Collection {
            resource: resource.into(),
            page,
            limit,
        }
    }

    /// Endpoint path, matching what the accessors request.
    pub fn endpoint(&self) -> String {
        match self {
            PrefetchTarget::Global(slug) => global_endpoint(slug),
            PrefetchTarget::Collection {
                resource,
                page,
                limit,
            } => collection_endpoint(resource, *page, *limit),
        }
    }

    /// Load the target through its accessor so the response shape is checked
    /// the same way its readers will check it.
    async fn warm(&self, client: &CmsClient) -> Result<()> {
        match self {
            PrefetchTarget::Global(slug) => client.fetch_global(slug, None).await.map(|_| ()),
            PrefetchTarget::Collection {
                resource,
                page,
                limit,
            } => client
                .fetch_collection::<Value>(resource, *page, *limit, client.product_options())
                .await
                .map(|_| ()),
        }
    }
}

/// Outcome of a prefetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefetchReport {
    /// Endpoints that are now cached.
    pub succeeded: Vec<String>,
    /// Endpoints that failed, with the error message.
    pub failed: Vec<(String, String)>,
}

impl PrefetchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Warms the client's cache with a fixed set of targets.
#[derive(Debug, Clone)]
pub struct Prefetcher {
    client: CmsClient,
    targets: Vec<PrefetchTarget>,
}

impl Prefetcher {
    pub fn new(client: CmsClient, targets: Vec<PrefetchTarget>) -> Self {
        Self { client, targets }
    }

    /// Every page global plus the first page of each catalog collection.
    pub fn with_defaults(client: CmsClient) -> Self {
        Self::new(client, default_targets())
    }

    pub fn targets(&self) -> &[PrefetchTarget] {
        &self.targets
    }

    /// Fetch every target concurrently and wait for all of them to settle.
    pub async fn prefetch_all(&self) -> PrefetchReport {
        let fetches = self.targets.iter().map(|target| {
            let endpoint = target.endpoint();
            async move { (endpoint, target.warm(&self.client).await) }
        });

        let mut report = PrefetchReport::default();
        for (endpoint, result) in join_all(fetches).await {
            match result {
                Ok(_) => report.succeeded.push(endpoint),
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "prefetch failed");
                    report.failed.push((endpoint, e.to_string()));
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "prefetched common data"
        );
        report
    }

    /// Run [`Prefetcher::prefetch_all`] as a detached task.
    pub fn spawn(self) -> JoinHandle<PrefetchReport> {
        tokio::spawn(async move { self.prefetch_all().await })
    }
}

pub fn default_targets() -> Vec<PrefetchTarget> {
    let mut targets: Vec<PrefetchTarget> = PAGE_GLOBALS
        .iter()
        .map(|slug| PrefetchTarget::global(*slug))
        .collect();
    targets.push(PrefetchTarget::collection(SMARTPHONES, 1, SMARTPHONES_PER_PAGE));
    targets.push(PrefetchTarget::collection(APPLICATIONS, 1, APPLICATIONS_PER_PAGE));
    targets
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cms::HttpResponse;
    use crate::cms::mock::{MockTransport, client_with, collection_page, url_for};

    #[test]
    fn test_default_targets() {
        let endpoints: Vec<String> = default_targets().iter().map(|t| t.endpoint()).collect();

        assert_eq!(endpoints.len(), 8);
        assert_eq!(endpoints[0], "/globals/homepage");
        assert!(endpoints.contains(&"/smartphones?page=1&limit=6".to_string()));
        assert!(endpoints.contains(&"/applications?page=1&limit=8".to_string()));
    }

    #[tokio::test]
    async fn test_prefetch_tolerates_failures() {
        let mock = MockTransport::new();
        for slug in PAGE_GLOBALS {
            mock.json(&global_endpoint(slug), json!({"slug": slug}));
        }
        mock.respond("/globals/contact", HttpResponse::new(500, "down"));
        mock.json("/smartphones?page=1&limit=6", collection_page("phone", 6, 1, 1));
        mock.json("/applications?page=1&limit=8", collection_page("app", 8, 1, 1));
        let client = client_with(mock.clone());

        let report = Prefetcher::with_defaults(client.clone()).prefetch_all().await;

        assert_eq!(report.total(), 8);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "/globals/contact");
        for endpoint in &report.succeeded {
            assert!(client.cache().contains(&url_for(endpoint)));
        }
        assert!(!client.cache().contains(&url_for("/globals/contact")));
        assert_eq!(client.cache().len(), 7);
    }

    #[tokio::test]
    async fn test_collection_without_docs_is_failure() {
        let mock = MockTransport::new();
        mock.json("/applications?page=1&limit=8", json!({"message": "maintenance"}));
        mock.json("/globals/about", json!(["not", "an", "object"]));
        let client = client_with(mock);

        let report = Prefetcher::new(
            client,
            vec![
                PrefetchTarget::collection(APPLICATIONS, 1, APPLICATIONS_PER_PAGE),
                PrefetchTarget::global("about"),
            ],
        )
        .prefetch_all()
        .await;

        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed[0].1.contains("docs"));
    }

    #[tokio::test]
    async fn test_prefetch_warms_pager_keys() {
        let mock = MockTransport::new();
        mock.json("/smartphones?page=1&limit=6", collection_page("phone", 6, 1, 1));
        let client = client_with(mock.clone());

        Prefetcher::new(
            client.clone(),
            vec![PrefetchTarget::collection(SMARTPHONES, 1, SMARTPHONES_PER_PAGE)],
        )
        .prefetch_all()
        .await;
        let pager = crate::state::collection::smartphones(client).await;

        assert_eq!(pager.items().len(), 6);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_spawned_prefetch_completes() {
        let mock = MockTransport::new();
        mock.json("/globals/homepage", json!({}));
        let client = client_with(mock);

        let handle = Prefetcher::new(client.clone(), vec![PrefetchTarget::global("homepage")]).spawn();
        let report = handle.await.unwrap();

        assert_eq!(report.succeeded, vec!["/globals/homepage".to_string()]);
        assert!(client.cache().contains(&url_for("/globals/homepage")));
    }
}
