//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy},
};
use core_async::time::sleep;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Construction options for [`ReqwestHttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout applied when a request does not set its own
    pub timeout: Duration,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Retry behaviour for transient failures
    pub retry_policy: RetryPolicy,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("songmeta/", env!("CARGO_PKG_VERSION")).to_string(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

/// Reqwest-based HTTP client implementation
///
/// Provides HTTP operations with:
/// - Connection pooling via reqwest
/// - Automatic retry with exponential backoff on 5xx, 429 and connect/timeout errors
/// - TLS via rustls
///
/// Dropping the future returned by [`HttpClient::execute`] aborts the request,
/// which is how provider cancellation reaches the socket.
pub struct ReqwestHttpClient {
    client: Client,
    retry_policy: RetryPolicy,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(4)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| {
                BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            retry_policy: config.retry_policy,
        })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client, retry_policy: RetryPolicy) -> Self {
        Self {
            client,
            retry_policy,
        }
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }

    /// Build reqwest request from bridge request
    fn build_request(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    fn is_retryable_status(status: u16) -> bool {
        status >= 500 || status == 429
    }

    fn convert_error(error: reqwest::Error, timeout: Option<Duration>) -> BridgeError {
        if error.is_timeout() {
            BridgeError::Timeout(timeout.unwrap_or_default())
        } else if error.is_connect() {
            BridgeError::Connection(error.to_string())
        } else {
            BridgeError::OperationFailed(error.to_string())
        }
    }

    /// Execute request with retry logic
    ///
    /// A retryable status on the last attempt is returned as a response, not
    /// an error, so callers still see the real status code.
    async fn execute_with_retry(&self, request: HttpRequest) -> Result<HttpResponse> {
        let policy = &self.retry_policy;
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                attempt,
                max_attempts,
                url = %request.url,
                "Executing HTTP request"
            );

            let last_attempt = attempt >= max_attempts;

            match self.build_request(&request).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if Self::is_retryable_status(status) && !last_attempt {
                        warn!(status, attempt, "HTTP request failed with retryable status");
                    } else {
                        let headers: HashMap<String, String> = response
                            .headers()
                            .iter()
                            .filter_map(|(k, v)| {
                                v.to_str().ok().map(|s| (k.to_string(), s.to_string()))
                            })
                            .collect();

                        let body = response
                            .bytes()
                            .await
                            .map_err(|e| Self::convert_error(e, request.timeout))?;

                        return Ok(HttpResponse {
                            status,
                            headers,
                            body,
                        });
                    }
                }
                Err(e) => {
                    warn!(error = %e, attempt, "HTTP request failed");
                    let error = Self::convert_error(e, request.timeout);
                    if last_attempt || !error.is_transient() {
                        return Err(error);
                    }
                }
            }

            let delay = policy.delay_for(attempt);
            debug!(delay_ms = delay.as_millis() as u64, "Retrying after delay");
            sleep(delay).await;
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with_retry(request).await
    }
}
