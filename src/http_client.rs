// src/http_client.rs
// Shared HTTP client configuration for all upstream providers

use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use crate::error::{Result, VizzyError};

/// Default maximum retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 2;
/// Default base backoff duration between retries (doubles each attempt)
const DEFAULT_BASE_BACKOFF_MS: u64 = 500;
/// Default connect timeout
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Shared HTTP client configuration for upstream providers
pub struct UpstreamHttpClient {
    client: Client,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl UpstreamHttpClient {
    pub fn new(request_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS).min(request_timeout))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            request_timeout,
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
        }
    }

    /// A client that never retries: one attempt, then the caller decides
    pub fn single_attempt(request_timeout: Duration) -> Self {
        Self {
            max_retries: 0,
            ..Self::new(request_timeout)
        }
    }

    /// POST a JSON body with Bearer auth. Returns the response body as text on success.
    pub async fn post_json(
        &self,
        request_id: &str,
        url: &str,
        api_key: &str,
        body: String,
    ) -> Result<String> {
        self.execute_with_retry(request_id, body, |client, body| {
            client
                .post(url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .body(body)
        })
        .await
    }

    /// Execute an HTTP request, retrying 429/5xx and connect/timeout failures.
    ///
    /// The `build_request` closure is called on each attempt with the reqwest Client
    /// and the request body, allowing callers to customize URL, headers, and auth.
    pub async fn execute_with_retry<F>(
        &self,
        request_id: &str,
        body: String,
        build_request: F,
    ) -> Result<String>
    where
        F: Fn(&Client, String) -> reqwest::RequestBuilder,
    {
        let mut attempts = 0;
        let mut backoff = self.base_backoff;

        loop {
            match build_request(&self.client, body.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        let error_body = response.text().await.unwrap_or_default();

                        if attempts < self.max_retries
                            && (status.as_u16() == 429 || status.is_server_error())
                        {
                            warn!(
                                request_id = %request_id,
                                status = %status,
                                "Transient error, retrying in {:?}...",
                                backoff
                            );
                            tokio::time::sleep(backoff).await;
                            attempts += 1;
                            backoff *= 2;
                            continue;
                        }

                        return Err(VizzyError::Upstream(format!(
                            "API error {}: {}",
                            status,
                            truncate(&error_body, 300)
                        )));
                    }

                    return Ok(response.text().await?);
                }
                Err(e) => {
                    // Only connection/timeout errors are safe to retry
                    if attempts < self.max_retries && (e.is_connect() || e.is_timeout()) {
                        warn!(
                            request_id = %request_id,
                            error = %e,
                            "Request failed (connect/timeout), retrying in {:?}...",
                            backoff
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        backoff *= 2;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = UpstreamHttpClient::new(Duration::from_secs(10));
        assert_eq!(client.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(client.request_timeout, Duration::from_secs(10));
        assert_eq!(client.base_backoff, Duration::from_millis(DEFAULT_BASE_BACKOFF_MS));
    }

    #[test]
    fn test_single_attempt_never_retries() {
        let client = UpstreamHttpClient::single_attempt(Duration::from_secs(30));
        assert_eq!(client.max_retries, 0);
        assert_eq!(client.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("hi", 3), "hi");
        assert_eq!(truncate("héllo", 2), "hé");
    }

    #[tokio::test]
    async fn test_connection_refused_is_upstream_error() {
        let client = UpstreamHttpClient {
            client: Client::new(),
            request_timeout: Duration::from_millis(500),
            max_retries: 1,
            base_backoff: Duration::from_millis(10),
        };
        let result = client
            .post_json("test", "http://127.0.0.1:1", "key", "{}".into())
            .await;
        assert!(matches!(result, Err(VizzyError::Upstream(_))));
    }
}
