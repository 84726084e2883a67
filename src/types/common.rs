//! Common data types for Kinesis listings.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A stream tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value; may be absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    /// Create a tag.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// Status of a registered consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumerStatus {
    /// Registration in progress.
    Creating,
    /// Deregistration in progress.
    Deleting,
    /// Ready for use.
    Active,
    /// A status this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// A consumer registered with a stream for enhanced fan-out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Consumer {
    /// Consumer name.
    pub consumer_name: String,
    /// Consumer ARN.
    #[serde(rename = "ConsumerARN")]
    pub consumer_arn: String,
    /// Current status.
    pub consumer_status: ConsumerStatus,
    /// When the consumer was registered.
    #[serde(default, deserialize_with = "epoch_seconds")]
    pub consumer_creation_timestamp: Option<DateTime<Utc>>,
}

/// Continuation token for `ListStreams`.
///
/// Newer endpoints return `NextToken`; older ones only set `HasMoreStreams`,
/// in which case the listing resumes after the last stream name seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStreamsCursor {
    /// Opaque server token.
    NextToken(String),
    /// Resume after this stream name.
    ExclusiveStart(String),
}

/// AWS JSON timestamps are fractional seconds since the epoch.
fn epoch_seconds<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(seconds) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !seconds.is_finite() {
        return Ok(None);
    }

    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    Ok(Utc.timestamp_opt(whole as i64, nanos).single())
}
