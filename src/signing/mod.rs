//! AWS Signature V4 signing for Kinesis control-plane requests.
//!
//! Requests are JSON 1.1 `POST`s to the service root; the signer covers the
//! host, the `x-amz-*` headers (including `x-amz-target`), and the content
//! type, with the SHA-256 of the JSON body as payload hash.

mod canonical;
mod signer;

pub use canonical::uri_encode;
pub use signer::{AwsSignerV4, RequestSigner, SignedRequest};

use crate::credentials::AwsCredentials;
use crate::error::SigningError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// AWS Signature V4 algorithm identifier.
pub const AWS_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Signing name of the Kinesis service.
pub const KINESIS_SERVICE: &str = "kinesis";

/// SHA-256 of `data`, hex encoded.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// HMAC-SHA256 of `data` under `key`.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| SigningError::CalculationFailed {
            message: e.to_string(),
        })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derive the signing key for one day, region and service.
///
/// kDate = HMAC("AWS4" + SecretKey, Date)
/// kRegion = HMAC(kDate, Region)
/// kService = HMAC(kRegion, Service)
/// kSigning = HMAC(kService, "aws4_request")
pub fn derive_signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, SigningError> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// Credential scope: `{date}/{region}/{service}/aws4_request`.
pub fn credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/aws4_request", date_stamp, region, service)
}

/// Timestamp in `YYYYMMDD'T'HHMMSS'Z'` form.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Date stamp in `YYYYMMDD` form.
pub fn format_date_stamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

/// Whether a header takes part in the signature.
pub fn should_sign_header(header_name: &str) -> bool {
    let name = header_name.to_lowercase();
    name == "host" || name == "content-type" || name.starts_with("x-amz-")
}

/// Inputs to one signature calculation.
#[derive(Debug, Clone, Copy)]
pub struct SigningParams<'a> {
    /// HTTP method.
    pub method: &'a str,
    /// URL path.
    pub path: &'a str,
    /// Raw query string, without the leading `?`.
    pub query: &'a str,
    /// Headers to consider for signing.
    pub headers: &'a [(String, String)],
    /// Hex SHA-256 of the body.
    pub payload_hash: &'a str,
    /// Region of the endpoint.
    pub region: &'a str,
    /// Service signing name.
    pub service: &'a str,
    /// Request time.
    pub timestamp: &'a DateTime<Utc>,
}

/// Compute the `Authorization` header value for a request.
pub fn sign_request(
    params: &SigningParams<'_>,
    credentials: &AwsCredentials,
) -> Result<String, SigningError> {
    let date_stamp = format_date_stamp(params.timestamp);
    let amz_date = format_datetime(params.timestamp);

    let (canonical_request, signed_headers) = canonical::canonical_request(
        params.method,
        params.path,
        params.query,
        params.headers,
        params.payload_hash,
    );

    let scope = credential_scope(&date_stamp, params.region, params.service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        AWS_ALGORITHM,
        amz_date,
        scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let signing_key = derive_signing_key(
        credentials.secret_access_key(),
        &date_stamp,
        params.region,
        params.service,
    )?;
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        AWS_ALGORITHM,
        credentials.access_key_id(),
        scope,
        signed_headers,
        signature
    ))
}
