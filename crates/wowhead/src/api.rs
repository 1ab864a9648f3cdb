//! HTTP client for Wowhead pages and the tooltip JSON endpoint.

use std::time::Duration;

use async_trait::async_trait;
use craftbook_core::identifier::ResourceKind;
use serde::Deserialize;

use crate::config::WowheadConfig;

/// A fetched page after redirects.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL of the last response in the redirect chain.
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

/// Display fields of the tooltip JSON payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tooltip {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Errors from the Wowhead HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum WowheadApiError {
    /// The HTTP request itself failed (network, DNS, TLS, redirect limit).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Wowhead returned a non-2xx status code.
    #[error("Wowhead API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Source of pages and tooltips. Implemented by [`WowheadApi`]; tests
/// substitute canned responses.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url`, following redirects. Non-2xx responses are errors.
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, WowheadApiError>;

    async fn fetch_tooltip(
        &self,
        kind: ResourceKind,
        id: u64,
        locale: &str,
    ) -> Result<Tooltip, WowheadApiError>;
}

/// HTTP client for wowhead.com.
#[derive(Clone)]
pub struct WowheadApi {
    client: reqwest::Client,
    tooltip_base: String,
}

impl WowheadApi {
    /// Build a client with the configured redirect limit, timeout and user
    /// agent.
    pub fn new(config: &WowheadConfig) -> Result<Self, WowheadApiError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self::with_client(client, config.tooltip_base.clone()))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, tooltip_base: String) -> Self {
        Self {
            client,
            tooltip_base,
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`WowheadApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, WowheadApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(WowheadApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl PageFetcher for WowheadApi {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, WowheadApiError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage {
            final_url,
            status,
            body,
        })
    }

    async fn fetch_tooltip(
        &self,
        kind: ResourceKind,
        id: u64,
        locale: &str,
    ) -> Result<Tooltip, WowheadApiError> {
        let response = self
            .client
            .get(format!("{}/{kind}/{id}", self.tooltip_base))
            .query(&[("locale", locale)])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Tooltip>().await?)
    }
}
