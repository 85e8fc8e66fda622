//! Shared client configuration.
//!
//! A [`ClientConfig`] is constructed once, is read-only afterwards, and is
//! passed by reference to every resource-client constructor. All clients
//! built from the same config share its rate limiter.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::auth::ArmCredential;
use crate::client::RetryPolicy;
use crate::error::{ArmError, ArmResult};
use crate::rate_limit::{NopRateLimiter, RateLimiter};

/// Public-cloud resource-manager endpoint.
pub const DEFAULT_RESOURCE_MANAGER_ENDPOINT: &str = "https://management.azure.com";

/// Default interval between long-running-operation polls.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(5);

/// Default overall time budget for a long-running operation to reach a
/// terminal state before polling gives up.
pub const DEFAULT_POLLING_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything needed to construct an ARM resource client.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) subscription_id: String,
    pub(crate) resource_manager_endpoint: Url,
    pub(crate) credential: ArmCredential,
    pub(crate) rate_limiter: Arc<dyn RateLimiter>,
    pub(crate) polling_interval: Duration,
    pub(crate) polling_timeout: Duration,
    pub(crate) retry_policy: RetryPolicy,
    pub(crate) connect_timeout: Duration,
    pub(crate) read_timeout: Duration,
    pub(crate) http_client: Option<reqwest::Client>,
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    subscription_id: Option<String>,
    resource_manager_endpoint: Option<String>,
    credential: Option<ArmCredential>,
    rate_limiter: Option<Arc<dyn RateLimiter>>,
    polling_interval: Option<Duration>,
    polling_timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ClientConfig {
    /// Create a new builder for a `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// The target subscription ID.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Base URL of the control-plane REST API.
    pub fn resource_manager_endpoint(&self) -> &Url {
        &self.resource_manager_endpoint
    }

    /// The shared rate limiter gating every outbound call.
    pub fn rate_limiter(&self) -> Arc<dyn RateLimiter> {
        Arc::clone(&self.rate_limiter)
    }

    /// Interval between long-running-operation polls.
    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }

    /// Overall time budget for a long-running operation.
    pub fn polling_timeout(&self) -> Duration {
        self.polling_timeout
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("subscription_id", &self.subscription_id)
            .field("resource_manager_endpoint", &self.resource_manager_endpoint.as_str())
            .field("credential", &self.credential)
            .field("polling_interval", &self.polling_interval)
            .field("polling_timeout", &self.polling_timeout)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl ClientConfigBuilder {
    /// Set the subscription ID.
    ///
    /// If not set, the builder falls back to the `AZURE_SUBSCRIPTION_ID`
    /// environment variable.
    pub fn subscription_id(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(subscription_id.into());
        self
    }

    /// Set the resource-manager endpoint.
    ///
    /// Defaults to `AZURE_RESOURCE_MANAGER_ENDPOINT` when set, then to
    /// [`DEFAULT_RESOURCE_MANAGER_ENDPOINT`]. Sovereign clouds override this.
    pub fn resource_manager_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.resource_manager_endpoint = Some(endpoint.into());
        self
    }

    /// Set the credential used for the bearer authorizer.
    ///
    /// Defaults to [`ArmCredential::from_env`].
    pub fn credential(mut self, credential: ArmCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the rate limiter shared by every client built from this config.
    ///
    /// Defaults to [`NopRateLimiter`] (no throttling).
    pub fn rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Set the interval between long-running-operation polls.
    ///
    /// Defaults to [`DEFAULT_POLLING_INTERVAL`] (5 seconds).
    pub fn polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = Some(interval);
        self
    }

    /// Set the overall time budget for a long-running operation to reach a
    /// terminal state. Polling past this budget fails with
    /// [`ArmError::OperationTimedOut`].
    ///
    /// Defaults to [`DEFAULT_POLLING_TIMEOUT`] (15 minutes).
    pub fn polling_timeout(mut self, timeout: Duration) -> Self {
        self.polling_timeout = Some(timeout);
        self
    }

    /// Set the retry policy for transient transport errors.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Set the connection timeout.
    ///
    /// Ignored if a custom HTTP client is supplied via
    /// [`http_client`](Self::http_client).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout covering the whole request/response cycle.
    ///
    /// Ignored if a custom HTTP client is supplied via
    /// [`http_client`](Self::http_client).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Supply a custom HTTP client (proxies, pinned TLS, etc.).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the `ClientConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if no subscription ID is available or the endpoint
    /// URL cannot be parsed.
    pub fn build(self) -> ArmResult<ClientConfig> {
        let subscription_id = self
            .subscription_id
            .or_else(|| std::env::var("AZURE_SUBSCRIPTION_ID").ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ArmError::MissingConfig(
                    "subscription ID is required. Set it via builder or AZURE_SUBSCRIPTION_ID."
                        .into(),
                )
            })?;

        let endpoint_str = self
            .resource_manager_endpoint
            .or_else(|| std::env::var("AZURE_RESOURCE_MANAGER_ENDPOINT").ok())
            .unwrap_or_else(|| DEFAULT_RESOURCE_MANAGER_ENDPOINT.to_string());

        let resource_manager_endpoint = Url::parse(&endpoint_str)
            .map_err(|e| ArmError::invalid_endpoint_with_source("invalid endpoint URL", e))?;

        let credential = self.credential.map(Ok).unwrap_or_else(ArmCredential::from_env)?;

        Ok(ClientConfig {
            subscription_id,
            resource_manager_endpoint,
            credential,
            rate_limiter: self
                .rate_limiter
                .unwrap_or_else(|| Arc::new(NopRateLimiter)),
            polling_interval: self.polling_interval.unwrap_or(DEFAULT_POLLING_INTERVAL),
            polling_timeout: self.polling_timeout.unwrap_or(DEFAULT_POLLING_TIMEOUT),
            retry_policy: self.retry_policy.unwrap_or_default(),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT),
            http_client: self.http_client,
        })
    }
}
