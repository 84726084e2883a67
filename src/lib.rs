//! AWS Kinesis Integration Module
//!
//! Typed access to the Kinesis control-plane listings, exposed as lazy,
//! throttled, rate-limit-aware item streams.
//!
//! # Features
//!
//! - **Paginated streams**: `ListStreams`, `ListTagsForStream` and
//!   `ListStreamConsumers` flattened into a single [`futures::Stream`] each
//! - **Rate-limit retry**: throttled page fetches re-issued with the same
//!   continuation token under exponential backoff
//! - **Inter-page throttling**: a minimum gap between successive page requests
//! - **AWS Signature V4**: JSON 1.1 requests signed for the `kinesis` service
//! - **Reusable core**: [`pagination::paginate`] drives any token-paginated API
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aws_kinesis::{KinesisClient, ListStreamsRequest};
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aws_kinesis::KinesisError> {
//!     let client = aws_kinesis::create_client_from_env()?;
//!
//!     let names: Vec<String> = client
//!         .streams()
//!         .list_streams(ListStreamsRequest::new())
//!         .try_collect()
//!         .await?;
//!
//!     println!("{} streams", names.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mocks;
pub mod pagination;
pub mod services;
pub mod signing;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use client::{KinesisClient, KinesisClientBuilder, KinesisClientImpl};
pub use config::{KinesisConfig, KinesisConfigBuilder, ListingKind};
pub use credentials::{
    AwsCredentials, CredentialsProvider, EnvCredentialsProvider, StaticCredentialsProvider,
};
pub use error::{
    ApiError, ApiErrorKind, ConfigurationError, CredentialsError, KinesisError, NetworkError,
    RequestError, ResponseError, SigningError,
};
pub use pagination::{paginate, BackoffPolicy, Page, Paginator, ThrottlePolicy, TransientError};
pub use services::{PageStream, StreamsService};
pub use signing::{AwsSignerV4, RequestSigner};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    Consumer, ConsumerStatus, ListStreamConsumersRequest, ListStreamsCursor, ListStreamsRequest,
    ListTagsForStreamRequest, Tag,
};

/// Result type for Kinesis operations.
pub type Result<T> = std::result::Result<T, KinesisError>;

/// Create a new Kinesis client with the given configuration.
pub fn create_client(config: KinesisConfig) -> Result<KinesisClientImpl> {
    KinesisClientBuilder::new().config(config).build()
}

/// Create a new Kinesis client from environment variables.
pub fn create_client_from_env() -> Result<KinesisClientImpl> {
    KinesisClientBuilder::new().from_env().build()
}
