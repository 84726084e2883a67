//! Kinesis client implementation.
//!
//! This module provides the main client interface and builder.

use crate::config::KinesisConfig;
use crate::error::KinesisError;
use crate::services::StreamsService;
use crate::signing::{AwsSignerV4, RequestSigner};
use crate::transport::{HttpTransport, ReqwestTransport};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

/// Kinesis client trait.
pub trait KinesisClient: Send + Sync {
    /// Get the streams service.
    fn streams(&self) -> &StreamsService;

    /// Get the client configuration.
    fn config(&self) -> &KinesisConfig;
}

/// Kinesis client implementation.
pub struct KinesisClientImpl {
    config: Arc<KinesisConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn RequestSigner>,

    streams: OnceCell<StreamsService>,
}

impl KinesisClientImpl {
    /// Create a client signing with the configured credentials provider.
    pub fn new(config: KinesisConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let signer = Arc::new(AwsSignerV4::new(
            config.credentials_provider.clone(),
            &config.region,
        ));
        Self::with_signer(config, transport, signer)
    }

    /// Create a client with an explicit signer.
    pub fn with_signer(
        config: KinesisConfig,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn RequestSigner>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            signer,
            streams: OnceCell::new(),
        }
    }
}

impl KinesisClient for KinesisClientImpl {
    fn streams(&self) -> &StreamsService {
        self.streams.get_or_init(|| {
            StreamsService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer.clone(),
            )
        })
    }

    fn config(&self) -> &KinesisConfig {
        &self.config
    }
}

impl std::fmt::Debug for KinesisClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinesisClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for the Kinesis client.
#[derive(Default)]
pub struct KinesisClientBuilder {
    config: Option<KinesisConfig>,
    from_env: bool,
    transport: Option<Arc<dyn HttpTransport>>,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl KinesisClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: KinesisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom request signer.
    pub fn signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the Kinesis client.
    pub fn build(self) -> Result<KinesisClientImpl, KinesisError> {
        let config = if let Some(config) = self.config {
            config
        } else if self.from_env {
            KinesisConfig::builder().from_env().build()?
        } else {
            KinesisConfig::default()
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let transport = ReqwestTransport::builder()
                    .connect_timeout(config.connect_timeout)
                    .timeout(config.read_timeout)
                    .pool_max_idle_per_host(config.max_connections as usize)
                    .pool_idle_timeout(Some(config.idle_timeout))
                    .verify_ssl(config.verify_ssl)
                    .build()?;
                Arc::new(transport) as Arc<dyn HttpTransport>
            }
        };

        debug!(region = %config.region, endpoint = ?config.endpoint, "Building Kinesis client");

        Ok(match self.signer {
            Some(signer) => KinesisClientImpl::with_signer(config, transport, signer),
            None => KinesisClientImpl::new(config, transport),
        })
    }
}
