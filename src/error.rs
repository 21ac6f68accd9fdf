// Error types for the bertini data client.
// Covers transport failures, CMS status errors, and response validation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed: {status} for {endpoint}")]
    RequestFailed { status: u16, endpoint: String },

    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid response shape for {endpoint}: {reason}")]
    InvalidResponseShape { endpoint: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmsError {
    pub(crate) fn shape(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        CmsError::InvalidResponseShape {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CmsError>;
