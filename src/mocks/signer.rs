//! Mock signer for testing.

use crate::error::KinesisError;
use crate::signing::{RequestSigner, SignedRequest};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Recorded sign call.
#[derive(Debug, Clone)]
pub struct SignCall {
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: Url,
    /// Headers passed in.
    pub headers: HashMap<String, String>,
    /// Whether a body was supplied.
    pub has_body: bool,
}

/// Signer that adds fixed headers without computing a signature.
pub struct MockSigner {
    headers: HashMap<String, String>,
    error: Mutex<Option<KinesisError>>,
    sign_count: AtomicUsize,
    calls: Mutex<Vec<SignCall>>,
}

impl MockSigner {
    /// Create a new mock signer.
    pub fn new() -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            "authorization".to_string(),
            "AWS4-HMAC-SHA256 Credential=mock/20240115/us-east-1/kinesis/aws4_request".to_string(),
        );
        headers.insert("x-amz-date".to_string(), "20240115T100000Z".to_string());

        Self {
            headers,
            error: Mutex::new(None),
            sign_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock signer whose next call fails with `error`.
    pub fn with_error(error: KinesisError) -> Self {
        let signer = Self::new();
        *signer.error.lock() = Some(error);
        signer
    }

    /// Get the number of sign calls.
    pub fn sign_count(&self) -> usize {
        self.sign_count.load(Ordering::Relaxed)
    }

    /// Get the last sign call.
    pub fn last_call(&self) -> Option<SignCall> {
        self.calls.lock().last().cloned()
    }
}

impl Default for MockSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestSigner for MockSigner {
    async fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, KinesisError> {
        self.sign_count.fetch_add(1, Ordering::Relaxed);
        self.calls.lock().push(SignCall {
            method: method.to_string(),
            url: url.clone(),
            headers: headers.clone(),
            has_body: body.is_some(),
        });

        if let Some(error) = self.error.lock().take() {
            return Err(error);
        }

        let mut signed_headers = headers.clone();
        signed_headers.extend(self.headers.clone());

        Ok(SignedRequest {
            method: method.to_string(),
            url: url.clone(),
            headers: signed_headers,
            body: body.map(Bytes::copy_from_slice),
        })
    }
}

impl std::fmt::Debug for MockSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSigner")
            .field("sign_count", &self.sign_count())
            .finish()
    }
}
