//! Pexels photo search client
//!
//! Thin client around the Pexels `v1/search` endpoint. The handler only
//! needs the `src.large` URL of each photo, so the client flattens the
//! response into an ordered list of URLs. The upstream status code is
//! preserved on failure so the endpoint can relay it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, instrument, trace};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the photo search client
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search service answered with a non-success status
    #[error("Pexels API returned status {status}")]
    Upstream {
        /// HTTP status code returned by the search service
        status: u16,
        /// Response body, kept for server-side logging only
        body: String,
    },

    /// The request could not be completed at the transport level
    #[error("Network error during Pexels request: {0}")]
    Network(#[from] reqwest::Error),

    /// The request exceeded the client timeout
    #[error("Pexels request timed out")]
    Timeout,

    /// The response body could not be parsed
    #[error("Invalid Pexels response: {0}")]
    InvalidResponse(String),
}

/// Capability to search stock photos by text query
///
/// Implemented by [`PexelsClient`] in production and by in-memory mocks in
/// tests, so the search endpoint can be exercised without network access.
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    /// Return the image URLs for `query`, at most `per_page` of them,
    /// in the order the search service ranked them.
    async fn search(&self, query: &str, per_page: u32) -> Result<Vec<String>, SearchError>;
}

/// Client for the Pexels photo search API
#[derive(Debug, Clone)]
pub struct PexelsClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PexelsApiResponse {
    photos: Option<Vec<PexelsPhoto>>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    src: PexelsPhotoSrc,
}

#[derive(Debug, Deserialize)]
struct PexelsPhotoSrc {
    large: String,
}

impl PexelsClient {
    /// Creates a new client with the given API key and search endpoint URL.
    ///
    /// # Panics
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// only happens when TLS initialization fails at startup.
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    async fn search_inner(&self, query: &str, per_page: u32) -> Result<Vec<String>, SearchError> {
        debug!(url = %self.base_url, "Sending search request to Pexels");
        trace!(query = %query, per_page = per_page, "Search parameters");

        let response = self
            .http_client
            .get(&self.base_url)
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", query.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Pexels request timed out");
                    return SearchError::Timeout;
                }
                error!(error = %e, "Network error during Pexels request");
                SearchError::Network(e)
            })?;

        let status = response.status();
        debug!(status = %status, "Received response from Pexels");

        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status = status_code, body = %body, "Pexels API error");
            return Err(SearchError::Upstream {
                status: status_code,
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read Pexels response body");
            SearchError::Network(e)
        })?;

        trace!(body = %body, "Response body");

        let urls = parse_photo_urls(&body)?;

        debug!(result_count = urls.len(), "Search completed successfully");

        Ok(urls)
    }
}

#[async_trait]
impl PhotoSearch for PexelsClient {
    #[instrument(skip(self), fields(query = %query, per_page = per_page))]
    async fn search(&self, query: &str, per_page: u32) -> Result<Vec<String>, SearchError> {
        self.search_inner(query, per_page).await
    }
}

/// Extract the `src.large` URL of each photo, preserving upstream order
fn parse_photo_urls(body: &str) -> Result<Vec<String>, SearchError> {
    let response: PexelsApiResponse = serde_json::from_str(body).map_err(|e| {
        error!(error = %e, "Failed to parse Pexels response");
        SearchError::InvalidResponse(format!("JSON parse error: {e}"))
    })?;

    Ok(response
        .photos
        .unwrap_or_default()
        .into_iter()
        .map(|photo| photo.src.large)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PexelsClient::new("test-api-key", "https://api.pexels.com/v1/search");
        assert_eq!(client.api_key, "test-api-key");
        assert_eq!(client.base_url, "https://api.pexels.com/v1/search");
    }

    #[test]
    fn test_parse_photo_urls_preserves_order() {
        let body = r#"{
            "photos": [
                {"src": {"large": "https://example.com/a.jpg", "small": "https://example.com/a-s.jpg"}},
                {"src": {"large": "https://example.com/b.jpg"}},
                {"src": {"large": "https://example.com/c.jpg"}}
            ],
            "total_results": 3
        }"#;

        let urls = parse_photo_urls(body).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/a.jpg",
                "https://example.com/b.jpg",
                "https://example.com/c.jpg"
            ]
        );
    }

    #[test]
    fn test_parse_photo_urls_missing_photos_key() {
        let urls = parse_photo_urls(r#"{"total_results": 0}"#).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn test_parse_photo_urls_rejects_malformed_body() {
        let result = parse_photo_urls("not json");
        assert!(matches!(result, Err(SearchError::InvalidResponse(_))));
    }
}
