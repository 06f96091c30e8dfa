//! Plain HTTP fetch error types.

use thiserror::Error;

/// Error fetching an arbitrary web resource.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum WebError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} is larger than {limit} bytes")]
    TooLarge { url: String, limit: usize },

    #[error("could not read body of {url}: {message}")]
    Body { url: String, message: String },
}

impl WebError {
    /// Creates network error.
    #[must_use]
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates status error.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates too-large error.
    #[must_use]
    pub fn too_large(url: impl Into<String>, limit: usize) -> Self {
        Self::TooLarge {
            url: url.into(),
            limit,
        }
    }

    /// Creates body error.
    #[must_use]
    pub fn body(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Body {
            url: url.into(),
            message: message.into(),
        }
    }
}
