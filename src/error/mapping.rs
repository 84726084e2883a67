//! Mapping of AWS JSON error responses to typed errors.
//!
//! The Kinesis control plane speaks the AWS JSON 1.1 protocol and reports
//! failures as:
//!
//! ```json
//! {"__type": "LimitExceededException", "message": "Rate exceeded for stream"}
//! ```
//!
//! The `__type` value may carry a namespace prefix
//! (`com.amazonaws.kinesis.v20131202#LimitExceededException`), which is stripped.

use super::{ApiError, ApiErrorKind, KinesisError, ResponseError};
use serde::{Deserialize, Serialize};

/// Parsed AWS error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsErrorResponse {
    /// Error code.
    #[serde(rename = "__type", alias = "code", alias = "Code")]
    pub error_type: String,

    /// Human-readable error message.
    #[serde(default, alias = "Message")]
    pub message: String,
}

/// Parse an AWS error response body.
pub fn parse_error_response(body: &str) -> Result<AwsErrorResponse, KinesisError> {
    let mut response: AwsErrorResponse =
        serde_json::from_str(body).map_err(ResponseError::from)?;

    if let Some(hash_pos) = response.error_type.rfind('#') {
        response.error_type = response.error_type[hash_pos + 1..].to_string();
    }

    Ok(response)
}

/// Map an AWS error code to a typed [`ApiError`].
pub fn map_api_error(
    code: &str,
    message: impl Into<String>,
    status: u16,
    request_id: Option<String>,
) -> ApiError {
    let kind = match code {
        "LimitExceededException"
        | "ThrottlingException"
        | "Throttling"
        | "ProvisionedThroughputExceededException"
        | "TooManyRequestsException" => ApiErrorKind::Throttled,

        "ResourceNotFoundException" => ApiErrorKind::ResourceNotFound,

        "ResourceInUseException" => ApiErrorKind::ResourceInUse,

        "InvalidArgumentException"
        | "ValidationException"
        | "SerializationException"
        | "ExpiredNextTokenException" => ApiErrorKind::InvalidArgument,

        "AccessDeniedException"
        | "UnrecognizedClientException"
        | "InvalidSignatureException"
        | "MissingAuthenticationTokenException" => ApiErrorKind::AccessDenied,

        "ExpiredTokenException" => ApiErrorKind::ExpiredToken,

        "InternalFailure" | "InternalFailureException" | "ServiceUnavailable" => {
            ApiErrorKind::Internal
        }

        _ if status >= 500 => ApiErrorKind::Internal,
        _ => ApiErrorKind::Other,
    };

    ApiError {
        code: code.to_string(),
        message: message.into(),
        status,
        request_id,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("LimitExceededException", ApiErrorKind::Throttled; "limit exceeded")]
    #[test_case("ThrottlingException", ApiErrorKind::Throttled; "throttling")]
    #[test_case("ResourceNotFoundException", ApiErrorKind::ResourceNotFound; "not found")]
    #[test_case("ResourceInUseException", ApiErrorKind::ResourceInUse; "in use")]
    #[test_case("InvalidArgumentException", ApiErrorKind::InvalidArgument; "invalid argument")]
    #[test_case("ExpiredNextTokenException", ApiErrorKind::InvalidArgument; "expired next token")]
    #[test_case("AccessDeniedException", ApiErrorKind::AccessDenied; "access denied")]
    #[test_case("ExpiredTokenException", ApiErrorKind::ExpiredToken; "expired token")]
    #[test_case("SomethingNew", ApiErrorKind::Other; "unknown")]
    fn test_map_code(code: &str, expected: ApiErrorKind) {
        let err = map_api_error(code, "msg", 400, None);
        assert_eq!(err.kind, expected);
        assert_eq!(err.code, code);
    }

    #[test]
    fn test_unknown_5xx_is_internal() {
        let err = map_api_error("Weird", "msg", 503, None);
        assert_eq!(err.kind, ApiErrorKind::Internal);
    }

    #[test]
    fn test_parse_strips_namespace() {
        let body = r#"{"__type":"com.amazonaws.kinesis.v20131202#LimitExceededException","message":"Rate exceeded"}"#;
        let parsed = parse_error_response(body).unwrap();
        assert_eq!(parsed.error_type, "LimitExceededException");
        assert_eq!(parsed.message, "Rate exceeded");
    }

    #[test]
    fn test_parse_message_alias() {
        let body = r#"{"__type":"ResourceNotFoundException","Message":"Stream foo not found"}"#;
        let parsed = parse_error_response(body).unwrap();
        assert_eq!(parsed.message, "Stream foo not found");
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(parse_error_response("<html>").is_err());
    }
}
