// CMS API module.
// Provides the cached client, transport, and types for the headless CMS.

pub mod client;
pub mod endpoints;
pub mod fallback;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::CmsClient;
pub use endpoints::*;
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::*;
