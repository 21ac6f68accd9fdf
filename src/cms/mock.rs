// In-memory transport for tests.
// Serves canned responses per URL and records every request.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::cache::CacheStore;
use crate::error::Result;

use super::client::CmsClient;
use super::transport::{HttpResponse, Transport};

pub(crate) const TEST_API_URL: &str = "http://cms.test";

#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<String, HttpResponse>>,
    calls: Mutex<Vec<String>>,
    panics: Mutex<HashSet<String>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Serve `body` as JSON for `endpoint` (relative to `/api`).
    pub(crate) fn json(&self, endpoint: &str, body: Value) {
        self.respond(endpoint, HttpResponse::new(200, body.to_string()));
    }

    pub(crate) fn respond(&self, endpoint: &str, response: HttpResponse) {
        let url = url_for(endpoint);
        self.panics.lock().remove(&url);
        self.routes.lock().insert(url, response);
    }

    /// Make requests for `endpoint` panic until a response is set again.
    pub(crate) fn panic_on(&self, endpoint: &str) {
        self.panics.lock().insert(url_for(endpoint));
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub(crate) fn calls_to(&self, endpoint: &str) -> usize {
        let url = url_for(endpoint);
        self.calls.lock().iter().filter(|c| **c == url).count()
    }

    /// Poll until at least `n` requests were made, or give up after a second.
    pub(crate) async fn wait_for_calls(&self, n: usize) -> bool {
        let poll = async {
            while self.call_count() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(1), poll).await.is_ok()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.calls.lock().push(url.to_string());
        if self.panics.lock().contains(url) {
            panic!("transport failure for {}", url);
        }
        let response = self
            .routes
            .lock()
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, r#"{"errors":[{"message":"Not Found"}]}"#));
        Ok(response)
    }
}

pub(crate) fn url_for(endpoint: &str) -> String {
    format!("{}/api{}", TEST_API_URL, endpoint)
}

pub(crate) fn client_with(transport: Arc<MockTransport>) -> CmsClient {
    CmsClient::new(TEST_API_URL, transport, Arc::new(CacheStore::new()))
}

/// A CMS collection envelope with `count` numbered documents.
pub(crate) fn collection_page(prefix: &str, count: usize, page: u32, total_pages: u32) -> Value {
    let docs: Vec<Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": format!("{}-{}-{}", prefix, page, i),
                "name": format!("{} {}", prefix, i),
                "price": "5 000",
                "description": "test product",
            })
        })
        .collect();
    serde_json::json!({
        "docs": docs,
        "totalDocs": count as u32 * total_pages,
        "limit": count,
        "totalPages": total_pages,
        "page": page,
        "pagingCounter": 1,
        "hasPrevPage": page > 1,
        "hasNextPage": page < total_pages,
        "prevPage": if page > 1 { Some(page - 1) } else { None },
        "nextPage": if page < total_pages { Some(page + 1) } else { None },
    })
}
