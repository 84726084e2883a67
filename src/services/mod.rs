//! Kinesis service implementations.
//!
//! Every operation is an AWS JSON 1.1 call: a signed `POST /` whose
//! `X-Amz-Target` header names the operation. [`ApiInvoker`] performs that
//! exchange; the listing services drive it through the pagination layer.

mod streams;

pub use streams::StreamsService;

use crate::config::KinesisConfig;
use crate::error::{map_api_error, parse_error_response, KinesisError, RequestError, ResponseError};
use crate::signing::RequestSigner;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use futures::stream::BoxStream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Content type of AWS JSON 1.1 requests.
pub const JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Target prefix of the Kinesis API version this crate speaks.
pub const TARGET_PREFIX: &str = "Kinesis_20131202";

/// Lazy stream of listing results.
pub type PageStream<T> = BoxStream<'static, Result<T, KinesisError>>;

/// Sends one signed JSON 1.1 request and decodes the reply.
#[derive(Clone)]
pub struct ApiInvoker {
    config: Arc<KinesisConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn RequestSigner>,
}

impl ApiInvoker {
    /// Create a new invoker.
    pub fn new(
        config: Arc<KinesisConfig>,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn RequestSigner>,
    ) -> Self {
        Self {
            config,
            transport,
            signer,
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &KinesisConfig {
        &self.config
    }

    /// Invoke `operation` with `request` as the JSON body.
    pub async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, KinesisError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.config.resolve_endpoint()?;
        let body = serde_json::to_vec(request).map_err(|e| RequestError::Serialization {
            message: e.to_string(),
        })?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), JSON_CONTENT_TYPE.to_string());
        headers.insert(
            "x-amz-target".to_string(),
            format!("{}.{}", TARGET_PREFIX, operation),
        );

        let signed = self.signer.sign("POST", &url, &headers, Some(&body)).await?;

        let http_request = HttpRequest::new(signed.method, signed.url.as_str())
            .with_headers(signed.headers)
            .with_body(body);

        let response = self.transport.send(http_request).await?;

        if !response.is_success() {
            return Err(self.parse_error(operation, &response));
        }

        let payload: &[u8] = if response.body.is_empty() {
            b"{}"
        } else {
            &response.body
        };
        serde_json::from_slice(payload).map_err(|e| ResponseError::from(e).into())
    }

    fn parse_error(&self, operation: &str, response: &HttpResponse) -> KinesisError {
        let request_id = response.request_id().map(String::from);

        let (code, message) = match parse_error_response(&response.body_text()) {
            Ok(parsed) => (parsed.error_type, parsed.message),
            Err(_) => (
                response
                    .get_header("x-amzn-errortype")
                    .and_then(|t| t.split(':').next())
                    .unwrap_or("UnknownError")
                    .to_string(),
                response.body_text(),
            ),
        };

        let error = map_api_error(&code, message, response.status, request_id);
        debug!(
            operation,
            status = error.status,
            code = %error.code,
            request_id = error.request_id.as_deref().unwrap_or(""),
            "Kinesis API error"
        );
        error.into()
    }
}

impl std::fmt::Debug for ApiInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiInvoker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
