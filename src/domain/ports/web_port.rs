//! Plain web access port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::WebError;

/// Port for untyped HTTP access used when unwrapping and downloading attachments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebPort: Send + Sync {
    /// Issues a HEAD request, follows redirects and returns the final location.
    async fn final_location(&self, url: &str) -> Result<String, WebError>;

    /// Fetches a document as text, following redirects.
    async fn fetch_text(&self, url: &str) -> Result<String, WebError>;

    /// Downloads a resource, refusing bodies larger than `limit` bytes.
    async fn fetch_bytes(&self, url: &str, limit: usize) -> Result<Bytes, WebError>;
}
