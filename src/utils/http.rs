//! HTTP client utilities.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::retry::{with_retry, RetryConfig};
use crate::config::HttpConfig;
use crate::sources::SourceError;

/// Shared HTTP client for every metadata source
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryConfig,
}

impl HttpClient {
    /// Create a client from the `[http]` configuration section
    pub fn new(config: &HttpConfig) -> Result<Self, SourceError> {
        let user_agent = config.user_agent.clone().unwrap_or_else(|| {
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
        });

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SourceError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retry: RetryConfig::from_http(config),
        })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET a URL and decode the JSON body
    ///
    /// Status codes map to errors before the body is looked at: 404 is
    /// `NotFound`, 429 is `RateLimit`, 5xx is `Api`. A 2xx body that is not
    /// JSON fails with "API returned invalid response"; JSON of the wrong
    /// shape fails with "Unexpected response structure". Transient failures
    /// are retried according to the configured policy.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let body = with_retry(self.retry, || self.get_text(url, headers)).await?;

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|_| {
            let preview: String = body.chars().take(200).collect();
            tracing::debug!(url, preview = %preview, "Non-JSON response body");
            SourceError::Parse("API returned invalid response".to_string())
        })?;

        Ok(serde_json::from_value(value)?)
    }

    async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, SourceError> {
        tracing::debug!(url, "GET");

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::NOT_FOUND => Err(SourceError::NotFound(format!("Not found: {}", url))),
            StatusCode::TOO_MANY_REQUESTS => Err(SourceError::RateLimit),
            s if s.is_server_error() => Err(SourceError::Api(format!("HTTP {}", s.as_u16()))),
            s => Err(SourceError::InvalidRequest(format!("HTTP {}", s.as_u16()))),
        }
    }
}
