use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::FetchError;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_SECONDS: u64 = 5;
const REQUEST_TIMEOUT_SECONDS: u64 = 30;
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 2;

/// HTTP client for the Concourse REST API.
pub struct ConcourseClient {
    client: Client,
    protocol: String,
    token: Option<Token>,
    max_retries: u32,
    retry_delay: Duration,
}

impl ConcourseClient {
    /// Creates a client for hosts reached over `protocol` ("https" or "http").
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        protocol: &str,
        skip_ssl_validation: bool,
        token: Option<Token>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("concourse-summary/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .danger_accept_invalid_certs(skip_ssl_validation)
            .build()?;

        Ok(Self {
            client,
            protocol: protocol.to_string(),
            token,
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_secs(RETRY_DELAY_SECONDS),
        })
    }

    /// Overrides how often and how long to wait before retrying
    /// rate-limited, failing or unreachable requests.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Root URL of `host` (e.g., "ci.example.com" or "127.0.0.1:8080").
    pub(super) fn host_url(&self, host: &str) -> Result<Url, FetchError> {
        let raw = format!("{}://{host}", self.protocol);
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    /// GETs `url` and decodes the JSON body, retrying on network errors,
    /// rate limits and server errors.
    pub(super) async fn get_json<T>(&self, url: Url) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let mut retry_count = 0;
        loop {
            debug!("GET {url}");
            let request = self.auth_request(self.client.get(url.clone()));

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    if retry_count >= self.max_retries {
                        return Err(e.into());
                    }
                    warn!(
                        "Network error ({e}), retrying in {:?} ({}/{})...",
                        self.retry_delay,
                        retry_count + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    retry_count += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                if retry_count >= self.max_retries {
                    return Err(FetchError::ApiErrorAfterRetries {
                        status: status.as_u16(),
                        retries: self.max_retries,
                    });
                }

                warn!(
                    "Concourse API error (status {status}). Waiting {:?} before retry {}/{}...",
                    self.retry_delay,
                    retry_count + 1,
                    self.max_retries
                );

                tokio::time::sleep(self.retry_delay).await;
                retry_count += 1;
                continue;
            }

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                return Err(FetchError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                });
            }

            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_url() {
        let client = ConcourseClient::new("https", false, None).unwrap();
        let url = client.host_url("ci.example.com").unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/");
    }

    #[test]
    fn test_host_url_keeps_port() {
        let client = ConcourseClient::new("http", false, None).unwrap();
        let url = client.host_url("127.0.0.1:8080").unwrap();
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_host_url_rejects_invalid_host() {
        let client = ConcourseClient::new("https", false, None).unwrap();
        let err = client.host_url("bad host:port").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
