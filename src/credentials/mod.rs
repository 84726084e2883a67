//! AWS credentials used to sign control-plane requests.
//!
//! Credentials are supplied as given, either explicitly or from the standard
//! environment variables. Discovery chains and refresh are left to the caller,
//! who can plug any source in through [`CredentialsProvider`].

mod env;

pub use env::EnvCredentialsProvider;

use crate::error::{CredentialsError, KinesisError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// AWS credentials.
#[derive(Clone)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: SecretString,
    session_token: Option<SecretString>,
    expiration: Option<DateTime<Utc>>,
}

impl AwsCredentials {
    /// Create new long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into()),
            session_token: None,
            expiration: None,
        }
    }

    /// Create temporary credentials with a session token.
    pub fn with_session_token(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            session_token: Some(SecretString::new(session_token.into())),
            ..Self::new(access_key_id, secret_access_key)
        }
    }

    /// Set an expiration time.
    pub fn expires_at(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Get the access key ID.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Get the secret access key.
    ///
    /// Note: This exposes the secret. Avoid logging it.
    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    /// Get the session token, if any.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token
            .as_ref()
            .map(|s| s.expose_secret().as_str())
    }

    /// Get the expiration time, if any.
    pub fn expiration(&self) -> Option<&DateTime<Utc>> {
        self.expiration.as_ref()
    }

    /// Check if credentials have expired.
    pub fn is_expired(&self) -> bool {
        match &self.expiration {
            Some(exp) => Utc::now() >= *exp,
            None => false,
        }
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Source of credentials for request signing.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Get credentials from this provider.
    async fn get_credentials(&self) -> Result<AwsCredentials, KinesisError>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Fixed credentials.
pub struct StaticCredentialsProvider {
    credentials: AwsCredentials,
}

impl StaticCredentialsProvider {
    /// Create a new static credentials provider.
    pub fn new(credentials: AwsCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, KinesisError> {
        if self.credentials.is_expired() {
            return Err(CredentialsError::Expired {
                expiration: self
                    .credentials
                    .expiration()
                    .map(|e| e.to_rfc3339())
                    .unwrap_or_default(),
            }
            .into());
        }
        Ok(self.credentials.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

impl fmt::Debug for StaticCredentialsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialsProvider")
            .field("credentials", &self.credentials)
            .finish()
    }
}
