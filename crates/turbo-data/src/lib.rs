//! HTTP client utilities for TurboCart.
//!
//! Provides a small async client for JSON `GET` lookups against a storefront
//! API, with a base URL, default headers, a request timeout and a retry
//! policy.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use turbo_data::FetchClient;
//!
//! let client = FetchClient::new(Duration::from_secs(5))?
//!     .with_base_url("http://localhost:3333");
//!
//! // Required record
//! let stock: Stock = client.get_json("stock/1").await?;
//!
//! // Record that may be missing (404 -> None)
//! let product: Option<Product> = client.get_optional_json("products/1").await?;
//! ```

mod error;
mod retry;

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

pub use error::FetchError;
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for making outbound requests.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    retry: RetryPolicy,
}

impl FetchClient {
    /// Create a new HTTP client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: None,
            default_headers: HashMap::new(),
            retry: RetryPolicy::default(),
        })
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Resolve a path against the base URL.
    ///
    /// Absolute `http://` / `https://` URLs are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) if !path.starts_with("http://") && !path.starts_with("https://") => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }
            _ => path.to_string(),
        }
    }

    /// `GET` a JSON document. Any non-2xx status is an error.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url(path);
        let response = self.send(&url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpError {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `GET` a JSON document that may not exist.
    ///
    /// A 404 status, an empty body or a JSON `null` body yields `None`.
    pub async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, FetchError> {
        let url = self.url(path);
        let response = self.send(&url).await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(%url, "resource not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::HttpError {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(serde_json::from_slice::<Option<T>>(&bytes)?)
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let mut attempt = 0;
        loop {
            let mut request = self.client.get(url);
            for (key, value) in &self.default_headers {
                request = request.header(key.as_str(), value.as_str());
            }

            tracing::debug!(%url, attempt, "GET");
            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !self.retry.should_retry_status(status, attempt) {
                        return Ok(response);
                    }
                    tracing::warn!(%url, status, attempt, "retrying after server error");
                }
                Err(e) => {
                    let error = FetchError::from(e);
                    if !self.retry.should_retry_error(&error, attempt) {
                        return Err(error);
                    }
                    tracing::warn!(%url, %error, attempt, "retrying after transport error");
                }
            }

            tokio::time::sleep(self.retry.backoff.delay_for_attempt(attempt)).await;
            attempt += 1;
        }
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, RetryPolicy};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FetchClient {
        FetchClient::new(DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn test_url_without_base() {
        assert_eq!(client().url("http://x/products/1"), "http://x/products/1");
        assert_eq!(client().url("products/1"), "products/1");
    }

    #[test]
    fn test_url_joins_single_slash() {
        let c = client().with_base_url("http://localhost:3333/");
        assert_eq!(c.url("products/1"), "http://localhost:3333/products/1");
        assert_eq!(c.url("/stock/1"), "http://localhost:3333/stock/1");
    }

    #[test]
    fn test_absolute_url_bypasses_base() {
        let c = client().with_base_url("http://localhost:3333");
        assert_eq!(c.url("https://api.example.com/a"), "https://api.example.com/a");
    }

    #[test]
    fn test_error_status() {
        let err = FetchError::HttpError {
            status: 502,
            url: "u".into(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(FetchError::Timeout("t".into()).status(), None);
    }
}
