//! Configuration types for the Kinesis client.
//!
//! `KinesisConfig` carries the region, credentials, transport timeouts and the
//! pagination policies applied to the control-plane listings.

use crate::credentials::{CredentialsProvider, EnvCredentialsProvider};
use crate::error::{ConfigurationError, KinesisError};
use crate::pagination::{BackoffPolicy, ThrottlePolicy};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Largest page size accepted by the listing APIs.
pub const MAX_PAGE_LIMIT: u32 = 10_000;

/// Paginated listings exposed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingKind {
    /// `ListStreams`.
    Streams,
    /// `ListTagsForStream`.
    Tags,
    /// `ListStreamConsumers`.
    Consumers,
}

impl ListingKind {
    /// Control-plane operation name.
    pub fn operation(&self) -> &'static str {
        match self {
            ListingKind::Streams => "ListStreams",
            ListingKind::Tags => "ListTagsForStream",
            ListingKind::Consumers => "ListStreamConsumers",
        }
    }
}

/// Configuration for the Kinesis client.
#[derive(Clone)]
pub struct KinesisConfig {
    /// AWS region (e.g., "us-east-1").
    pub region: String,

    /// Credentials provider.
    pub credentials_provider: Arc<dyn CredentialsProvider>,

    /// Custom endpoint URL (local emulators, VPC endpoints).
    pub endpoint: Option<Url>,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Timeout for a single request, enforced by the transport.
    pub read_timeout: Duration,

    /// Maximum idle connections kept per host.
    pub max_connections: u32,

    /// Idle connection timeout.
    pub idle_timeout: Duration,

    /// Verify SSL certificates.
    pub verify_ssl: bool,

    /// Attempts per page fetch, including the first.
    pub max_attempts: u32,

    /// Initial backoff delay after a throttled fetch.
    pub initial_backoff: Duration,

    /// Maximum backoff delay.
    pub max_backoff: Duration,

    /// Backoff multiplier for exponential backoff.
    pub backoff_multiplier: f64,

    /// Randomize backoff delays.
    pub backoff_jitter: bool,

    /// Minimum gap between `ListStreams` page requests.
    pub list_streams_interval: Duration,

    /// Minimum gap between `ListTagsForStream` page requests.
    pub list_tags_interval: Duration,

    /// Minimum gap between `ListStreamConsumers` page requests.
    pub list_consumers_interval: Duration,

    /// Page size requested when a call does not set one.
    pub page_limit: Option<u32>,
}

impl std::fmt::Debug for KinesisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinesisConfig")
            .field("region", &self.region)
            .field("credentials_provider", &self.credentials_provider.name())
            .field("endpoint", &self.endpoint)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("max_connections", &self.max_connections)
            .field("verify_ssl", &self.verify_ssl)
            .field("max_attempts", &self.max_attempts)
            .field("list_streams_interval", &self.list_streams_interval)
            .field("list_tags_interval", &self.list_tags_interval)
            .field("list_consumers_interval", &self.list_consumers_interval)
            .field("page_limit", &self.page_limit)
            .finish_non_exhaustive()
    }
}

impl Default for KinesisConfig {
    fn default() -> Self {
        let backoff = BackoffPolicy::default();
        Self {
            region: "us-east-1".to_string(),
            credentials_provider: Arc::new(EnvCredentialsProvider::new()),
            endpoint: None,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            max_connections: 16,
            idle_timeout: Duration::from_secs(90),
            verify_ssl: true,
            max_attempts: backoff.max_attempts,
            initial_backoff: backoff.initial_delay,
            max_backoff: backoff.max_delay,
            backoff_multiplier: backoff.multiplier,
            backoff_jitter: backoff.jitter,
            list_streams_interval: ThrottlePolicy::default().min_interval,
            list_tags_interval: ThrottlePolicy::default().min_interval,
            list_consumers_interval: Duration::ZERO,
            page_limit: None,
        }
    }
}

impl KinesisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> KinesisConfigBuilder {
        KinesisConfigBuilder::default()
    }

    /// Endpoint that requests are sent to.
    pub fn resolve_endpoint(&self) -> Result<Url, KinesisError> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }

        let url_str = format!("https://kinesis.{}.amazonaws.com", self.region);
        Url::parse(&url_str).map_err(|e| {
            ConfigurationError::InvalidEndpoint {
                url: url_str,
                details: e.to_string(),
            }
            .into()
        })
    }

    /// Backoff applied to throttled page fetches.
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(self.max_attempts)
            .with_initial_delay(self.initial_backoff)
            .with_max_delay(self.max_backoff)
            .with_multiplier(self.backoff_multiplier)
            .with_jitter(self.backoff_jitter)
    }

    /// Inter-page throttle for one listing.
    pub fn throttle_for(&self, kind: ListingKind) -> ThrottlePolicy {
        ThrottlePolicy::new(match kind {
            ListingKind::Streams => self.list_streams_interval,
            ListingKind::Tags => self.list_tags_interval,
            ListingKind::Consumers => self.list_consumers_interval,
        })
    }
}

/// Builder for Kinesis configuration.
#[derive(Default)]
pub struct KinesisConfigBuilder {
    region: Option<String>,
    credentials_provider: Option<Arc<dyn CredentialsProvider>>,
    endpoint: Option<Url>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    max_connections: Option<u32>,
    idle_timeout: Option<Duration>,
    verify_ssl: Option<bool>,
    max_attempts: Option<u32>,
    initial_backoff: Option<Duration>,
    max_backoff: Option<Duration>,
    backoff_multiplier: Option<f64>,
    backoff_jitter: Option<bool>,
    list_streams_interval: Option<Duration>,
    list_tags_interval: Option<Duration>,
    list_consumers_interval: Option<Duration>,
    page_limit: Option<u32>,
}

impl KinesisConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the credentials provider.
    pub fn credentials_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials_provider = Some(provider);
        self
    }

    /// Set a custom endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, KinesisError> {
        let url_str = endpoint.into();
        let url = Url::parse(&url_str).map_err(|e| ConfigurationError::InvalidEndpoint {
            url: url_str,
            details: e.to_string(),
        })?;
        self.endpoint = Some(url);
        Ok(self)
    }

    /// Set a custom endpoint URL (infallible version).
    pub fn endpoint_url(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the per-request timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    pub fn max_connections(mut self, connections: u32) -> Self {
        self.max_connections = Some(connections);
        self
    }

    /// Set the idle connection timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Enable or disable SSL verification.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Set the attempts allowed per page fetch.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Set the initial backoff delay.
    pub fn initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = Some(delay);
        self
    }

    /// Set the maximum backoff delay.
    pub fn max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = Some(delay);
        self
    }

    /// Set the backoff multiplier.
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = Some(multiplier);
        self
    }

    /// Enable or disable backoff jitter.
    pub fn backoff_jitter(mut self, jitter: bool) -> Self {
        self.backoff_jitter = Some(jitter);
        self
    }

    /// Set the `ListStreams` inter-page interval.
    pub fn list_streams_interval(mut self, interval: Duration) -> Self {
        self.list_streams_interval = Some(interval);
        self
    }

    /// Set the `ListTagsForStream` inter-page interval.
    pub fn list_tags_interval(mut self, interval: Duration) -> Self {
        self.list_tags_interval = Some(interval);
        self
    }

    /// Set the `ListStreamConsumers` inter-page interval.
    pub fn list_consumers_interval(mut self, interval: Duration) -> Self {
        self.list_consumers_interval = Some(interval);
        self
    }

    /// Set the default page size.
    pub fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        if let Ok(region) = std::env::var("AWS_REGION") {
            self.region = Some(region);
        } else if let Ok(region) = std::env::var("AWS_DEFAULT_REGION") {
            self.region = Some(region);
        }

        let endpoint = std::env::var("AWS_ENDPOINT_URL_KINESIS")
            .or_else(|_| std::env::var("AWS_ENDPOINT_URL"));
        if let Ok(endpoint) = endpoint {
            if let Ok(url) = Url::parse(&endpoint) {
                self.endpoint = Some(url);
            }
        }

        if let Ok(val) = std::env::var("KINESIS_INTEGRATION_MAX_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                self.max_attempts = Some(attempts);
            }
        }
        if let Ok(val) = std::env::var("KINESIS_INTEGRATION_PAGE_INTERVAL_MS") {
            if let Ok(ms) = val.parse() {
                self.list_streams_interval = Some(Duration::from_millis(ms));
                self.list_tags_interval = Some(Duration::from_millis(ms));
            }
        }
        if let Ok(val) = std::env::var("KINESIS_INTEGRATION_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                self.read_timeout = Some(Duration::from_millis(ms));
            }
        }

        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<KinesisConfig, KinesisError> {
        let defaults = KinesisConfig::default();

        let region = self.region.unwrap_or(defaults.region);
        if region.trim().is_empty() {
            return Err(invalid("region", "Region must not be empty"));
        }

        let max_attempts = self.max_attempts.unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            return Err(invalid("max_attempts", "At least one attempt is required"));
        }

        let backoff_multiplier = self.backoff_multiplier.unwrap_or(defaults.backoff_multiplier);
        if !backoff_multiplier.is_finite() || backoff_multiplier < 1.0 {
            return Err(invalid(
                "backoff_multiplier",
                "Multiplier must be a finite value of at least 1.0",
            ));
        }

        if let Some(limit) = self.page_limit {
            if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
                return Err(invalid(
                    "page_limit",
                    &format!("Page limit must be between 1 and {}", MAX_PAGE_LIMIT),
                ));
            }
        }

        Ok(KinesisConfig {
            region,
            credentials_provider: self
                .credentials_provider
                .unwrap_or(defaults.credentials_provider),
            endpoint: self.endpoint,
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            read_timeout: self.read_timeout.unwrap_or(defaults.read_timeout),
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            idle_timeout: self.idle_timeout.unwrap_or(defaults.idle_timeout),
            verify_ssl: self.verify_ssl.unwrap_or(defaults.verify_ssl),
            max_attempts,
            initial_backoff: self.initial_backoff.unwrap_or(defaults.initial_backoff),
            max_backoff: self.max_backoff.unwrap_or(defaults.max_backoff),
            backoff_multiplier,
            backoff_jitter: self.backoff_jitter.unwrap_or(defaults.backoff_jitter),
            list_streams_interval: self
                .list_streams_interval
                .unwrap_or(defaults.list_streams_interval),
            list_tags_interval: self
                .list_tags_interval
                .unwrap_or(defaults.list_tags_interval),
            list_consumers_interval: self
                .list_consumers_interval
                .unwrap_or(defaults.list_consumers_interval),
            page_limit: self.page_limit,
        })
    }
}

fn invalid(field: &str, message: &str) -> KinesisError {
    ConfigurationError::InvalidConfiguration {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}
