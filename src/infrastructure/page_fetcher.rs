//! HTTP fetching - infrastructure layer.
//!
//! Owns the single `reqwest::Client` and exposes fetch capabilities to the
//! services. Requests carry a fixed desktop-browser User-Agent; there is no
//! auth, no retries and no rate limiting.

use crate::config::Config;
use crate::error::{AppError, Result};

/// HTTP page fetcher.
#[derive(Clone, Debug)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Builds the client with the configured User-Agent.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| AppError::http("client builder", e))?;
        Ok(Self { client })
    }

    /// GETs a page and returns its body as text.
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::http(url, e))?
            .error_for_status()
            .map_err(|e| AppError::http(url, e))?;
        response.text().await.map_err(|e| AppError::http(url, e))
    }

    /// GETs a resource and returns its bytes plus the raw Content-Type header.
    pub async fn fetch_bytes(&self, url: &str) -> Result<(Vec<u8>, Option<String>)> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::http(url, e))?
            .error_for_status()
            .map_err(|e| AppError::http(url, e))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::http(url, e))?;

        Ok((bytes.to_vec(), content_type))
    }
}
