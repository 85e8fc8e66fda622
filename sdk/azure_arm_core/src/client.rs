//! HTTP transport for Azure Resource Manager clients.
//!
//! [`ArmClient`] carries the wiring every resource client needs: base URI,
//! bearer authorizer, API version, user agent, retry policy, and the polling
//! interval for long-running operations. Resource crates construct one per
//! client from a shared [`ClientConfig`] and delegate every operation to it.

use std::time::Duration;

use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ArmError, ArmResult};
use crate::models::OperationStatus;

/// User agent sent with every control-plane request.
pub const USER_AGENT: &str = concat!("azure-arm-rs/", env!("CARGO_PKG_VERSION"));

/// Determines if an HTTP status code represents a retriable error.
///
/// Retriable errors are transient server-side issues that may succeed on retry:
/// - 429 Too Many Requests (service-side throttling)
/// - 500 Internal Server Error
/// - 502 Bad Gateway
/// - 503 Service Unavailable
/// - 504 Gateway Timeout
#[inline]
pub fn is_retriable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Configuration for automatic retry behavior on transient errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial backoff duration before the first retry.
    /// Subsequent retries use exponential backoff (2^attempt * initial_backoff).
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

/// Transport for one ARM resource provider.
///
/// Cheaply cloneable; holds no state beyond its configuration.
#[derive(Debug, Clone)]
pub struct ArmClient {
    http: HttpClient,
    endpoint: Url,
    credential: crate::auth::ArmCredential,
    subscription_id: String,
    api_version: String,
    polling_interval: Duration,
    polling_timeout: Duration,
    retry_policy: RetryPolicy,
}

impl ArmClient {
    /// Wire a transport for a resource provider from the shared config.
    ///
    /// `api_version` is the provider's REST API version and is appended to
    /// every relative request URL.
    pub fn new(config: &ClientConfig, api_version: &str) -> Self {
        let http = config.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .connect_timeout(config.connect_timeout)
                .timeout(config.read_timeout)
                .build()
                .expect("failed to build HTTP client")
        });

        Self {
            http,
            endpoint: config.resource_manager_endpoint.clone(),
            credential: config.credential.clone(),
            subscription_id: config.subscription_id.clone(),
            api_version: api_version.to_string(),
            polling_interval: config.polling_interval,
            polling_timeout: config.polling_timeout,
            retry_policy: config.retry_policy.clone(),
        }
    }

    /// The target subscription ID.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// The provider API version this transport was wired with.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build a full URL for an API path, adding the API version and any
    /// extra query parameters (`$expand`, `$filter`, ...).
    fn url_with(&self, path: &str, query: &[(&str, &str)]) -> ArmResult<Url> {
        let mut url = self
            .endpoint
            .join(path)
            .map_err(|e| ArmError::invalid_endpoint_with_source("failed to construct URL", e))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api-version", &self.api_version);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Send a GET request for an API path.
    pub async fn get(&self, path: &str) -> ArmResult<Response> {
        let url = self.url_with(path, &[])?;
        self.send::<()>(Method::GET, url, None).await
    }

    /// Send a GET request with extra query parameters.
    pub async fn get_with(&self, path: &str, query: &[(&str, &str)]) -> ArmResult<Response> {
        let url = self.url_with(path, query)?;
        self.send::<()>(Method::GET, url, None).await
    }

    /// Send a GET request to an absolute URL, e.g. a `nextLink` from a paged
    /// list response. No API version is appended; the link carries its own.
    pub async fn get_url(&self, url: &str) -> ArmResult<Response> {
        let url = Url::parse(url)
            .map_err(|e| ArmError::invalid_endpoint_with_source("invalid absolute URL", e))?;
        self.send::<()>(Method::GET, url, None).await
    }

    /// Send a PUT request with a JSON body.
    pub async fn put<T: serde::Serialize>(&self, path: &str, body: &T) -> ArmResult<Response> {
        let url = self.url_with(path, &[])?;
        self.send(Method::PUT, url, Some(body)).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post<T: serde::Serialize>(&self, path: &str, body: &T) -> ArmResult<Response> {
        let url = self.url_with(path, &[])?;
        self.send(Method::POST, url, Some(body)).await
    }

    /// Send a POST request without a body (e.g. `listKeys`).
    pub async fn post_empty(&self, path: &str) -> ArmResult<Response> {
        let url = self.url_with(path, &[])?;
        self.send::<()>(Method::POST, url, None).await
    }

    /// Send a DELETE request for an API path.
    pub async fn delete(&self, path: &str) -> ArmResult<Response> {
        let url = self.url_with(path, &[])?;
        self.send::<()>(Method::DELETE, url, None).await
    }

    /// Drive a long-running operation to completion and fetch the resource.
    ///
    /// A 200/201 response without an `Azure-AsyncOperation` header completed
    /// synchronously; its body is the resource. A 202 without the header has
    /// no body to parse, so the resource is fetched from `resource_path`.
    /// Otherwise the operation URL is polled at the configured interval until
    /// a terminal state, then the resource is re-fetched from `resource_path`.
    pub async fn wait_for_completion<T: DeserializeOwned>(
        &self,
        response: Response,
        resource_path: &str,
    ) -> ArmResult<T> {
        match Self::operation_url(&response)? {
            None if response.status() != reqwest::StatusCode::ACCEPTED => {
                Ok(response.json().await?)
            }
            None => {
                let response = self.get(resource_path).await?;
                Ok(response.json().await?)
            }
            Some(url) => {
                self.poll_operation(url).await?;
                let response = self.get(resource_path).await?;
                Ok(response.json().await?)
            }
        }
    }

    /// Drive a long-running operation with no resource body to completion
    /// (deletes, instance upgrades).
    pub async fn wait_for_operation(&self, response: Response) -> ArmResult<()> {
        match Self::operation_url(&response)? {
            None => Ok(()),
            Some(url) => self.poll_operation(url).await,
        }
    }

    /// Extract the `Azure-AsyncOperation` polling URL, if the service sent one.
    fn operation_url(response: &Response) -> ArmResult<Option<Url>> {
        let Some(header) = response.headers().get("azure-asyncoperation") else {
            return Ok(None);
        };

        let raw = header.to_str().map_err(|_| {
            ArmError::invalid_endpoint("Azure-AsyncOperation header is not valid UTF-8")
        })?;
        let url = Url::parse(raw).map_err(|e| {
            ArmError::invalid_endpoint_with_source("invalid Azure-AsyncOperation URL", e)
        })?;

        Ok(Some(url))
    }

    async fn poll_operation(&self, url: Url) -> ArmResult<()> {
        let deadline = std::time::Instant::now() + self.polling_timeout;

        loop {
            tokio::time::sleep(self.polling_interval).await;

            let response = self.send::<()>(Method::GET, url.clone(), None).await?;
            let operation: OperationStatus = response.json().await?;

            if !operation.is_terminal() {
                if std::time::Instant::now() >= deadline {
                    return Err(ArmError::OperationTimedOut {
                        timeout: self.polling_timeout,
                    });
                }
                tracing::trace!(status = %operation.status, "operation in progress");
                continue;
            }
            if operation.succeeded() {
                return Ok(());
            }

            let OperationStatus { status, error, .. } = operation;
            let (code, message) = error
                .map(|e| {
                    (
                        e.code.unwrap_or_else(|| "unknown".to_string()),
                        e.message.unwrap_or_default(),
                    )
                })
                .unwrap_or_else(|| ("unknown".to_string(), String::new()));

            return Err(ArmError::Operation {
                status,
                code,
                message: Self::truncate_message(&message),
            });
        }
    }

    /// Send one request with automatic retry on transient errors.
    ///
    /// Adds the bearer authorizer and user agent. Retriable HTTP statuses
    /// (429, 500, 502, 503, 504) are retried with jittered exponential
    /// backoff up to the configured maximum.
    async fn send<B: serde::Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> ArmResult<Response> {
        let auth = self.credential.resolve()?;

        for attempt in 0..=self.retry_policy.max_retries {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .header(reqwest::header::AUTHORIZATION, &auth)
                .header(reqwest::header::USER_AGENT, USER_AGENT);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status().as_u16();

            if response.status().is_success() {
                return Ok(response);
            }

            // Non-retriable error or last attempt - surface the error body.
            if !is_retriable_status(status) || attempt == self.retry_policy.max_retries {
                return Self::check_response(response).await;
            }

            // Backoff with jitter in [0.75, 1.25] of the exponential base.
            let base_backoff = self.retry_policy.initial_backoff * 2_u32.pow(attempt);
            let jitter = 0.75 + fastrand::f64() * 0.5;
            tokio::time::sleep(base_backoff.mul_f64(jitter)).await;
        }

        unreachable!("retry loop should return before reaching here")
    }

    /// Maximum length for error messages surfaced to callers.
    const MAX_ERROR_MESSAGE_LEN: usize = 1000;

    /// Redact bearer tokens so credentials never leak through error messages
    /// or logs.
    pub(crate) fn sanitize_error_message(msg: &str) -> String {
        let mut result = msg.to_string();

        let mut search_start = 0;
        while search_start < result.len() {
            let Some(relative_pos) = result[search_start..].find("Bearer ") else {
                break;
            };
            let token_start = search_start + relative_pos + 7;
            if token_start >= result.len() {
                break;
            }
            if result[token_start..].starts_with("[REDACTED]") {
                search_start = token_start + 10;
                continue;
            }

            let token_end = result[token_start..]
                .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
                .map(|pos| token_start + pos)
                .unwrap_or(result.len());

            if token_end > token_start {
                result.replace_range(token_start..token_end, "[REDACTED]");
                search_start = token_start + 10;
            } else {
                search_start = token_start;
            }
        }

        result
    }

    /// Sanitize and truncate a message before surfacing it.
    pub(crate) fn truncate_message(msg: &str) -> String {
        let sanitized = Self::sanitize_error_message(msg);

        if sanitized.len() <= Self::MAX_ERROR_MESSAGE_LEN {
            return sanitized;
        }

        // Localized service messages are valid input; cut on a char boundary.
        let mut end = Self::MAX_ERROR_MESSAGE_LEN;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &sanitized[..end])
    }

    /// Turn a non-success response into an error, parsing the ARM
    /// `{"error": {"code", "message"}}` body when present.
    async fn check_response(response: Response) -> ArmResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(err_obj) = value.get("error") {
                return Err(ArmError::Api {
                    code: err_obj
                        .get("code")
                        .and_then(|c| c.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    message: Self::truncate_message(
                        err_obj
                            .get("message")
                            .and_then(|m| m.as_str())
                            .unwrap_or(&body),
                    ),
                });
            }
        }

        Err(ArmError::Http {
            status,
            message: Self::truncate_message(&body),
        })
    }
}
