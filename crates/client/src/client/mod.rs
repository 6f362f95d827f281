//! HTTP client for the movie catalog API.

pub mod movies;

use std::time::Duration;

use url::Url;

use crate::error::{ClientError, Result};

pub use movies::DiscoverQuery;

/// Default catalog API root.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default artwork host root.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// HTTP client for the movie catalog API.
///
/// Every call performs exactly one round trip; retries are left to callers.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    image_base_url: String,
    api_key: Option<String>,
}

impl CatalogClient {
    /// Create a new client for the given API root and key.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: trim_trailing_slash(base_url.into()),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Rebuilds the underlying HTTP client with a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Sets the artwork host root.
    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = trim_trailing_slash(image_base_url.into());
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint, appending the API key and extra parameters.
    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::MissingApiKey)?;
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", api_key);
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Handle error responses.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(ClientError::from)
        } else if status.as_u16() == 401 {
            Err(ClientError::Unauthorized)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
