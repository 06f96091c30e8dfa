//! Plain HTTP client for link unwrapping and attachment downloads.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, Response, header, redirect};
use tracing::debug;

use crate::domain::errors::WebError;
use crate::domain::ports::WebPort;

const USER_AGENT: &str = concat!("ember/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;

/// `reqwest` backed [`WebPort`].
pub struct ReqwestWebClient {
    client: Client,
}

impl ReqwestWebClient {
    /// Creates new client.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout: Duration) -> Result<Self, WebError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| WebError::network("", format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<Response, WebError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WebError::network(url, e.to_string()))?;
        ensure_success(url, response)
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response, WebError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(WebError::status(url, status.as_u16()))
    }
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("text/html"))
}

#[async_trait]
impl WebPort for ReqwestWebClient {
    async fn final_location(&self, url: &str) -> Result<String, WebError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| WebError::network(url, e.to_string()))?;
        // Any completed answer counts, whatever its status; only transport failures are errors.
        let location = response.url().to_string();
        debug!(from = %url, to = %location, status = %response.status(), "Resolved redirect chain");
        Ok(location)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, WebError> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| WebError::body(url, e.to_string()))
    }

    async fn fetch_bytes(&self, url: &str, limit: usize) -> Result<Bytes, WebError> {
        let mut response = self.get(url).await?;
        if is_html(&response) {
            return Err(WebError::body(url, "expected media, got an HTML page"));
        }
        if response
            .content_length()
            .is_some_and(|length| length > limit as u64)
        {
            return Err(WebError::too_large(url, limit));
        }

        let mut buffer = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| WebError::body(url, e.to_string()))?
        {
            if buffer.len() + chunk.len() > limit {
                return Err(WebError::too_large(url, limit));
            }
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `/short` as a redirect to `/i/pic.jpg`, which refuses every method.
    async fn redirecting_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let response = if request.contains(" /short ") {
                    "HTTP/1.1 301 Moved Permanently\r\nLocation: /i/pic.jpg\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                } else {
                    "HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        base
    }

    #[tokio::test]
    async fn test_final_location_survives_refused_last_hop() {
        let base = redirecting_server().await;
        let client = ReqwestWebClient::new(Duration::from_secs(5)).unwrap();

        let location = client.final_location(&format!("{base}/short")).await.unwrap();

        assert_eq!(location, format!("{base}/i/pic.jpg"));
    }

    #[tokio::test]
    async fn test_final_location_unreachable_is_error() {
        let client = ReqwestWebClient::new(Duration::from_secs(2)).unwrap();
        let error = client.final_location("http://127.0.0.1:9/x").await.unwrap_err();
        assert!(matches!(error, WebError::Network { .. }));
    }

    #[test]
    fn test_client_builds() {
        assert!(ReqwestWebClient::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = ReqwestWebClient::new(Duration::from_secs(2)).unwrap();
        let error = client.fetch_text("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(error, WebError::Network { .. }));
    }
}
