//! Mock HTTP transport for testing.

use crate::error::{KinesisError, NetworkError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl MockResponse {
    /// Create a successful response with empty body.
    pub fn ok() -> Self {
        Self::error(200, Bytes::new())
    }

    /// Create a successful JSON 1.1 response.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::error(200, body).with_header("content-type", "application/x-amz-json-1.1")
    }

    /// Create an error response.
    pub fn error(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create a 400 AWS JSON error response for `code`.
    pub fn aws_error(status: u16, code: &str, message: &str) -> Self {
        Self::error(status, super::TestFixtures::error_json(code, message))
            .with_header("x-amzn-RequestId", "mock-request-id")
    }

    /// Create a rate-limit rejection.
    pub fn throttled() -> Self {
        Self::aws_error(400, "LimitExceededException", "Rate exceeded")
    }

    /// Add a header to the response.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// Builder for mock responses.
#[derive(Default)]
pub struct MockResponseBuilder {
    responses: Vec<MockResponse>,
}

impl MockResponseBuilder {
    /// Create a new mock response builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response to return.
    pub fn respond(mut self, response: MockResponse) -> Self {
        self.responses.push(response);
        self
    }

    /// Add multiple responses.
    pub fn respond_all(mut self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.responses.extend(responses);
        self
    }

    /// Build the mock transport.
    pub fn build(self) -> MockTransport {
        MockTransport::with_responses(self.responses)
    }
}

/// Mock HTTP transport that replays queued responses in order.
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<MockResponse>,
}

impl MockTransport {
    /// Create a new mock transport with no responses.
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            default_response: None,
        }
    }

    /// Create a mock transport that always returns `response` once the queue is empty.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::new()
        }
    }

    /// Create a builder for the mock transport.
    pub fn builder() -> MockResponseBuilder {
        MockResponseBuilder::new()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: MockResponse) {
        self.responses.lock().push_back(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    /// JSON bodies of all recorded requests.
    pub fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.requests
            .lock()
            .iter()
            .map(|r| {
                r.body
                    .as_ref()
                    .and_then(|b| serde_json::from_slice(b).ok())
                    .unwrap_or(serde_json::Value::Null)
            })
            .collect()
    }

    /// Number of responses still queued.
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, KinesisError> {
        self.requests.lock().push(request);

        let response = self
            .responses
            .lock()
            .pop_front()
            .or_else(|| self.default_response.clone());

        match response {
            Some(mock) => Ok(HttpResponse {
                status: mock.status,
                headers: mock.headers,
                body: mock.body,
            }),
            None => Err(NetworkError::ConnectionFailed {
                message: "No mock response available".to_string(),
            }
            .into()),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued_responses", &self.responses.lock().len())
            .field("recorded_requests", &self.requests.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_replays_in_order() {
        let transport = MockTransport::builder()
            .respond(MockResponse::json("first"))
            .respond(MockResponse::error(500, "second"))
            .build();

        let first = transport
            .send(HttpRequest::new("POST", "https://example.com/"))
            .await
            .unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(first.body, Bytes::from("first"));

        let second = transport
            .send(HttpRequest::new("POST", "https://example.com/"))
            .await
            .unwrap();
        assert_eq!(second.status, 500);
        assert_eq!(transport.request_count(), 2);
        assert_eq!(transport.remaining(), 0);
    }

    #[tokio::test]
    async fn test_mock_transport_exhausted() {
        let transport = MockTransport::new();
        let result = transport
            .send(HttpRequest::new("POST", "https://example.com/"))
            .await;

        assert!(matches!(
            result,
            Err(KinesisError::Network(NetworkError::ConnectionFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_mock_transport_default_response() {
        let transport = MockTransport::with_default(MockResponse::ok());
        for _ in 0..3 {
            let response = transport
                .send(HttpRequest::new("POST", "https://example.com/"))
                .await
                .unwrap();
            assert!(response.is_success());
        }
    }

    #[tokio::test]
    async fn test_mock_transport_records_bodies() {
        let transport = MockTransport::with_default(MockResponse::ok());
        transport
            .send(HttpRequest::new("POST", "https://example.com/").with_body(r#"{"Limit":5}"#))
            .await
            .unwrap();

        assert_eq!(
            transport.request_bodies(),
            vec![serde_json::json!({"Limit": 5})]
        );
        assert_eq!(transport.last_request().unwrap().method, "POST");
    }

    #[test]
    fn test_throttled_response() {
        let response = MockResponse::throttled();
        assert_eq!(response.status, 400);
        assert!(String::from_utf8_lossy(&response.body).contains("LimitExceededException"));
    }
}
