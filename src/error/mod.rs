//! Error types for the Kinesis integration module.
//!
//! Errors are grouped by where they originate: local configuration, credentials
//! and signing, the HTTP transport, response decoding, or the remote control
//! plane itself. Only throttling rejections from the control plane are treated
//! as transient by the pagination layer.

mod mapping;

pub use mapping::{map_api_error, parse_error_response, AwsErrorResponse};

use crate::pagination::TransientError;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the Kinesis integration.
#[derive(Debug, Error)]
pub enum KinesisError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Credential-related errors.
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// AWS signing errors.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Request validation errors.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Network and transport errors.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Response decoding errors.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Error returned by the Kinesis control plane.
    #[error("Service error: {0}")]
    Service(#[from] ApiError),
}

impl KinesisError {
    /// Returns true if the control plane rejected the request for rate limiting.
    pub fn is_throttling(&self) -> bool {
        matches!(self, KinesisError::Service(e) if e.kind == ApiErrorKind::Throttled)
    }

    /// Returns the HTTP status code if the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            KinesisError::Service(e) => Some(e.status),
            KinesisError::Request(_) => Some(400),
            _ => None,
        }
    }

    /// Returns the AWS error code if available.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            KinesisError::Service(e) => Some(&e.code),
            _ => None,
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            KinesisError::Service(e) => e.request_id.as_deref(),
            _ => None,
        }
    }
}

impl TransientError for KinesisError {
    fn is_transient(&self) -> bool {
        self.is_throttling()
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid endpoint URL.
    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint {
        /// The invalid URL.
        url: String,
        /// Details about the validation error.
        details: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },
}

/// Credential-related errors.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// No credentials could be found.
    #[error("Credentials not found: no credentials could be loaded from any source")]
    NotFound,

    /// Credentials have expired.
    #[error("Credentials expired: session credentials expired at {expiration}")]
    Expired {
        /// When the credentials expired.
        expiration: String,
    },

    /// Credentials are invalid.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Details about why credentials are invalid.
        message: String,
    },
}

/// AWS Signature V4 signing errors.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Signature calculation failed.
    #[error("Signature calculation failed: {message}")]
    CalculationFailed {
        /// Details about the calculation error.
        message: String,
    },

    /// The request URL has no host to sign.
    #[error("Missing host in URL: {url}")]
    MissingHost {
        /// The URL that was being signed.
        url: String,
    },
}

/// Request validation errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// General validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// Details about the validation error.
        message: String,
    },

    /// A required parameter was not provided.
    #[error("Missing parameter: {name}")]
    MissingParameter {
        /// The parameter name.
        name: String,
    },

    /// A parameter was outside its allowed range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Request body could not be serialized.
    #[error("Serialization failed: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

/// Network and transport errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection failed.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },

    /// Request timed out.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// The timeout duration.
        duration: Duration,
    },

    /// TLS or client construction error.
    #[error("TLS error: {message}")]
    TlsError {
        /// Error message.
        message: String,
    },
}

/// Response decoding errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// JSON parse error.
    #[error("JSON parse error: {message}")]
    JsonParseError {
        /// Error message.
        message: String,
    },

    /// Invalid response format.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl From<serde_json::Error> for ResponseError {
    fn from(err: serde_json::Error) -> Self {
        ResponseError::JsonParseError {
            message: err.to_string(),
        }
    }
}

/// Classification of control-plane error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Request rejected by rate limiting.
    Throttled,
    /// Stream or consumer does not exist.
    ResourceNotFound,
    /// Resource is not in a state that allows the operation.
    ResourceInUse,
    /// Malformed or out-of-range argument.
    InvalidArgument,
    /// Caller lacks permission.
    AccessDenied,
    /// Session token expired.
    ExpiredToken,
    /// Server-side failure.
    Internal,
    /// Any code this crate does not recognize.
    Other,
}

/// Error returned by the Kinesis control plane.
#[derive(Debug, Clone, Error)]
#[error("{code} ({status}): {message}")]
pub struct ApiError {
    /// AWS error code with any namespace prefix stripped.
    pub code: String,
    /// Human-readable message from the service.
    pub message: String,
    /// HTTP status of the response.
    pub status: u16,
    /// AWS request ID.
    pub request_id: Option<String>,
    /// Classification of `code`.
    pub kind: ApiErrorKind,
}
