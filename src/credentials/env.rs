//! Environment variable credentials provider.

use super::{AwsCredentials, CredentialsProvider};
use crate::error::{CredentialsError, KinesisError};
use async_trait::async_trait;
use std::env;

/// Default variable holding the access key ID.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Default variable holding the secret access key.
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Default variable holding the session token.
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Credentials provider that reads from environment variables.
///
/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and, if set,
/// `AWS_SESSION_TOKEN`. The variables are read on every call.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialsProvider {
    access_key_var: Option<String>,
    secret_key_var: Option<String>,
    session_token_var: Option<String>,
}

impl EnvCredentialsProvider {
    /// Create a provider with the standard variable names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider reading custom variable names.
    pub fn with_vars(
        access_key_var: impl Into<String>,
        secret_key_var: impl Into<String>,
        session_token_var: Option<String>,
    ) -> Self {
        Self {
            access_key_var: Some(access_key_var.into()),
            secret_key_var: Some(secret_key_var.into()),
            session_token_var,
        }
    }

    fn access_key_var(&self) -> &str {
        self.access_key_var.as_deref().unwrap_or(AWS_ACCESS_KEY_ID)
    }

    fn secret_key_var(&self) -> &str {
        self.secret_key_var
            .as_deref()
            .unwrap_or(AWS_SECRET_ACCESS_KEY)
    }

    fn session_token_var(&self) -> &str {
        self.session_token_var
            .as_deref()
            .unwrap_or(AWS_SESSION_TOKEN)
    }

    fn read_required(name: &str) -> Result<String, KinesisError> {
        let value = env::var(name).map_err(|_| CredentialsError::NotFound)?;
        if value.is_empty() {
            return Err(CredentialsError::Invalid {
                message: format!("{} is empty", name),
            }
            .into());
        }
        Ok(value)
    }
}

#[async_trait]
impl CredentialsProvider for EnvCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, KinesisError> {
        let access_key_id = Self::read_required(self.access_key_var())?;
        let secret_access_key = Self::read_required(self.secret_key_var())?;

        let credentials = match env::var(self.session_token_var())
            .ok()
            .filter(|s| !s.is_empty())
        {
            Some(token) => {
                AwsCredentials::with_session_token(access_key_id, secret_access_key, token)
            }
            None => AwsCredentials::new(access_key_id, secret_access_key),
        };

        Ok(credentials)
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names so tests can run in parallel.
    fn provider(prefix: &str) -> EnvCredentialsProvider {
        EnvCredentialsProvider::with_vars(
            format!("{}_ACCESS", prefix),
            format!("{}_SECRET", prefix),
            Some(format!("{}_TOKEN", prefix)),
        )
    }

    #[test]
    fn test_env_provider_success() {
        env::set_var("KTEST_OK_ACCESS", "AKID");
        env::set_var("KTEST_OK_SECRET", "SECRET");

        let creds = tokio_test::block_on(provider("KTEST_OK").get_credentials()).unwrap();
        assert_eq!(creds.access_key_id(), "AKID");
        assert!(creds.session_token().is_none());
    }

    #[test]
    fn test_env_provider_with_session_token() {
        env::set_var("KTEST_SESSION_ACCESS", "AKID");
        env::set_var("KTEST_SESSION_SECRET", "SECRET");
        env::set_var("KTEST_SESSION_TOKEN", "TOKEN");

        let creds =
            tokio_test::block_on(provider("KTEST_SESSION").get_credentials()).unwrap();
        assert_eq!(creds.session_token(), Some("TOKEN"));
    }

    #[test]
    fn test_env_provider_missing() {
        let result = tokio_test::block_on(provider("KTEST_MISSING").get_credentials());
        assert!(matches!(
            result,
            Err(KinesisError::Credentials(CredentialsError::NotFound))
        ));
    }

    #[test]
    fn test_env_provider_empty_access_key() {
        env::set_var("KTEST_EMPTY_ACCESS", "");
        env::set_var("KTEST_EMPTY_SECRET", "SECRET");

        let result = tokio_test::block_on(provider("KTEST_EMPTY").get_credentials());
        assert!(matches!(
            result,
            Err(KinesisError::Credentials(CredentialsError::Invalid { .. }))
        ));
    }
}
