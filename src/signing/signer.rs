//! Request signer backed by a credentials provider.

use super::*;
use crate::credentials::CredentialsProvider;
use crate::error::KinesisError;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// A signed request ready to be sent.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: String,
    /// Full URL.
    pub url: Url,
    /// Headers including `authorization`.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
}

/// Signs outgoing requests.
#[async_trait]
pub trait RequestSigner: Send + Sync {
    /// Sign a request with AWS Signature V4.
    async fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, KinesisError>;
}

/// AWS Signature V4 signer.
pub struct AwsSignerV4 {
    credentials_provider: Arc<dyn CredentialsProvider>,
    region: String,
    service: String,
}

impl AwsSignerV4 {
    /// Create a signer for the Kinesis service in `region`.
    pub fn new(credentials_provider: Arc<dyn CredentialsProvider>, region: impl Into<String>) -> Self {
        Self::with_service(credentials_provider, region, KINESIS_SERVICE)
    }

    /// Create a signer for another service signing name.
    pub fn with_service(
        credentials_provider: Arc<dyn CredentialsProvider>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            credentials_provider,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Region this signer signs for.
    pub fn region(&self) -> &str {
        &self.region
    }

    fn host_header(url: &Url) -> Result<String, SigningError> {
        let host = url.host_str().ok_or_else(|| SigningError::MissingHost {
            url: url.to_string(),
        })?;
        Ok(match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }
}

#[async_trait]
impl RequestSigner for AwsSignerV4 {
    async fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, KinesisError> {
        let credentials = self.credentials_provider.get_credentials().await?;
        let timestamp = Utc::now();
        let payload_hash = sha256_hex(body.unwrap_or_default());

        let mut final_headers: HashMap<String, String> = headers
            .iter()
            .filter(|(name, _)| {
                let name = name.to_lowercase();
                name != "host" && name != "x-amz-date" && name != "authorization"
            })
            .map(|(name, value)| (name.to_lowercase(), value.clone()))
            .collect();
        final_headers.insert("host".to_string(), Self::host_header(url)?);
        final_headers.insert("x-amz-date".to_string(), format_datetime(&timestamp));
        if let Some(token) = credentials.session_token() {
            final_headers.insert("x-amz-security-token".to_string(), token.to_string());
        }

        let signing_headers: Vec<(String, String)> = final_headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let authorization = sign_request(
            &SigningParams {
                method,
                path: url.path(),
                query: url.query().unwrap_or(""),
                headers: &signing_headers,
                payload_hash: &payload_hash,
                region: &self.region,
                service: &self.service,
                timestamp: &timestamp,
            },
            &credentials,
        )?;
        final_headers.insert("authorization".to_string(), authorization);

        Ok(SignedRequest {
            method: method.to_string(),
            url: url.clone(),
            headers: final_headers,
            body: body.map(Bytes::copy_from_slice),
        })
    }
}

impl fmt::Debug for AwsSignerV4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsSignerV4")
            .field("provider", &self.credentials_provider.name())
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{AwsCredentials, StaticCredentialsProvider};

    fn signer(creds: AwsCredentials) -> AwsSignerV4 {
        AwsSignerV4::new(Arc::new(StaticCredentialsProvider::new(creds)), "us-east-1")
    }

    #[tokio::test]
    async fn test_sign_adds_auth_headers() {
        let signer = signer(AwsCredentials::new("AKID", "SECRET"));
        let url = Url::parse("https://kinesis.us-east-1.amazonaws.com/").unwrap();
        let mut headers = HashMap::new();
        headers.insert(
            "X-Amz-Target".to_string(),
            "Kinesis_20131202.ListStreams".to_string(),
        );

        let signed = signer.sign("POST", &url, &headers, Some(b"{}")).await.unwrap();

        assert_eq!(
            signed.headers.get("host").map(String::as_str),
            Some("kinesis.us-east-1.amazonaws.com")
        );
        assert!(signed.headers.contains_key("x-amz-date"));
        assert!(!signed.headers.contains_key("x-amz-security-token"));

        let auth = signed.headers.get("authorization").unwrap();
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKID/"));
        assert!(auth.contains("/us-east-1/kinesis/aws4_request"));
        assert!(auth.contains("SignedHeaders=host;x-amz-date;x-amz-target"));
        assert_eq!(signed.body.as_deref(), Some(&b"{}"[..]));
    }

    #[tokio::test]
    async fn test_sign_includes_session_token() {
        let signer = signer(AwsCredentials::with_session_token("AKID", "SECRET", "TOKEN"));
        let url = Url::parse("http://localhost:4567/").unwrap();

        let signed = signer.sign("POST", &url, &HashMap::new(), None).await.unwrap();

        assert_eq!(
            signed.headers.get("host").map(String::as_str),
            Some("localhost:4567")
        );
        assert_eq!(
            signed.headers.get("x-amz-security-token").map(String::as_str),
            Some("TOKEN")
        );
        assert!(signed
            .headers
            .get("authorization")
            .unwrap()
            .contains("x-amz-security-token"));
    }
}
