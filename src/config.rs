//! Configuration types for the background removal web service

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BgWebError, Result};

/// Environment variable holding the Pexels API credential
pub const PEXELS_API_KEY_ENV: &str = "PEXELS_API_KEY";

/// Default Hugging Face URL for the segmentation model
pub const DEFAULT_MODEL_URL: &str = "https://huggingface.co/imgly/isnet-general-onnx";

/// Default Pexels search endpoint
pub const DEFAULT_PEXELS_URL: &str = "https://api.pexels.com/v1/search";

/// Configuration for the web service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Directory holding the processed output image
    pub storage_dir: PathBuf,

    /// Pexels API credential, sent as the `Authorization` header
    pub pexels_api_key: String,

    /// Base URL of the Pexels search endpoint (overridable for tests)
    pub pexels_base_url: String,

    /// Query used when the client omits the `query` parameter
    pub default_query: String,

    /// Number of photo results requested per search
    pub per_page: u32,

    /// URL of the segmentation model to download and cache at startup
    pub model_url: String,
}

impl ServerConfig {
    /// Create a configuration builder
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::new()
    }

    /// Read the Pexels API key from the environment
    ///
    /// # Errors
    /// Returns an error when the variable is unset or empty.
    pub fn api_key_from_env() -> Result<String> {
        match std::env::var(PEXELS_API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(BgWebError::invalid_config(format!(
                "{PEXELS_API_KEY_ENV} must be set to a non-empty Pexels API key"
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            storage_dir: PathBuf::from("./static/images"),
            pexels_api_key: String::new(),
            pexels_base_url: DEFAULT_PEXELS_URL.to_string(),
            default_query: "people".to_string(),
            per_page: 15,
            model_url: DEFAULT_MODEL_URL.to_string(),
        }
    }
}

/// Builder for [`ServerConfig`]
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Create a builder seeded with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address
    #[must_use]
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Set the storage directory for the output image
    #[must_use]
    pub fn storage_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.storage_dir = dir.into();
        self
    }

    /// Set the Pexels API key
    #[must_use]
    pub fn pexels_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.config.pexels_api_key = key.into();
        self
    }

    /// Set the Pexels base URL
    #[must_use]
    pub fn pexels_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.pexels_base_url = url.into();
        self
    }

    /// Set the default search query
    #[must_use]
    pub fn default_query<S: Into<String>>(mut self, query: S) -> Self {
        self.config.default_query = query.into();
        self
    }

    /// Set the page size for search requests
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.config.per_page = per_page;
        self
    }

    /// Set the segmentation model URL
    #[must_use]
    pub fn model_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.model_url = url.into();
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    /// Returns an error when the API key is empty, the page size is zero,
    /// or the default query is blank.
    pub fn build(self) -> Result<ServerConfig> {
        if self.config.pexels_api_key.trim().is_empty() {
            return Err(BgWebError::invalid_config(
                "Pexels API key must not be empty",
            ));
        }
        if self.config.per_page == 0 {
            return Err(BgWebError::invalid_config("per_page must be at least 1"));
        }
        if self.config.default_query.trim().is_empty() {
            return Err(BgWebError::invalid_config(
                "default query must not be empty",
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ServerConfig::builder()
            .pexels_api_key("test-key")
            .build()
            .unwrap();

        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.default_query, "people");
        assert_eq!(config.per_page, 15);
        assert_eq!(config.pexels_base_url, DEFAULT_PEXELS_URL);
        assert_eq!(config.model_url, DEFAULT_MODEL_URL);
    }

    #[test]
    fn test_builder_rejects_empty_api_key() {
        let result = ServerConfig::builder().build();
        assert!(result.is_err());

        let result = ServerConfig::builder().pexels_api_key("   ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_zero_page_size() {
        let result = ServerConfig::builder()
            .pexels_api_key("key")
            .per_page(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ServerConfig::builder()
            .pexels_api_key("key")
            .bind_addr(SocketAddr::from(([0, 0, 0, 0], 8080)))
            .storage_dir("/tmp/images")
            .pexels_base_url("http://localhost:9999/v1/search")
            .default_query("dogs")
            .per_page(5)
            .build()
            .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/images"));
        assert_eq!(config.default_query, "dogs");
        assert_eq!(config.per_page, 5);
    }
}
