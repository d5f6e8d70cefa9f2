//! Page Fetcher: `GET url -> body text`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;

use crate::error::FetchError;

/// Retrieves the raw text of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// # Errors
    ///
    /// Returns [`FetchError`] when the page cannot be retrieved.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

/// `reqwest`-backed [`PageFetcher`] that sends a fixed set of headers with
/// every request.
///
/// By default the status code is not inspected: error pages are handed to the
/// extractor like any other body and fail there. With `strict_status` set, a
/// non-2xx status is reported as [`FetchError::UnexpectedStatus`] instead.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    strict_status: bool,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with a request timeout, `User-Agent`, and
    /// default headers.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed, e.g. for a user agent that is not a valid
    /// header value.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        headers: HeaderMap,
        strict_status: bool,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            strict_status,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!(url, "fetching page");

        let http_err = |source: reqwest::Error| FetchError::Http {
            url: url.to_owned(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if self.strict_status && !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "non-2xx response passed through");
        }

        response.text().await.map_err(http_err)
    }
}
