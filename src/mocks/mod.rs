//! Mock implementations for testing.
//!
//! [`MockTransport`] replays queued responses and records requests;
//! [`MockSigner`] stands in for SigV4 so tests need no credentials.

mod signer;
mod transport;

pub use signer::{MockSigner, SignCall};
pub use transport::{MockResponse, MockResponseBuilder, MockTransport};

use crate::types::Tag;
use serde_json::json;

/// JSON bodies for Kinesis listing responses.
pub struct TestFixtures;

impl TestFixtures {
    /// Sample stream ARN.
    pub const STREAM_ARN: &'static str = "arn:aws:kinesis:us-east-1:123456789012:stream/orders";

    /// `ListStreams` page with a `NextToken`.
    pub fn list_streams_json(names: &[&str], next_token: Option<&str>) -> String {
        let mut body = json!({
            "StreamNames": names,
            "HasMoreStreams": next_token.is_some(),
        });
        if let Some(token) = next_token {
            body["NextToken"] = json!(token);
        }
        body.to_string()
    }

    /// `ListStreams` page from an endpoint that only reports `HasMoreStreams`.
    pub fn list_streams_legacy_json(names: &[&str], has_more: bool) -> String {
        json!({
            "StreamNames": names,
            "HasMoreStreams": has_more,
        })
        .to_string()
    }

    /// `ListTagsForStream` page.
    pub fn list_tags_json(tags: &[(&str, &str)], has_more: bool) -> String {
        let tags: Vec<_> = tags
            .iter()
            .map(|(k, v)| json!({"Key": k, "Value": v}))
            .collect();
        json!({
            "Tags": tags,
            "HasMoreTags": has_more,
        })
        .to_string()
    }

    /// `ListStreamConsumers` page.
    pub fn list_consumers_json(names: &[&str], next_token: Option<&str>) -> String {
        let consumers: Vec<_> = names
            .iter()
            .map(|name| {
                json!({
                    "ConsumerName": name,
                    "ConsumerARN": format!("{}/consumer/{}:1700000000", Self::STREAM_ARN, name),
                    "ConsumerStatus": "ACTIVE",
                    "ConsumerCreationTimestamp": 1700000000.0,
                })
            })
            .collect();
        let mut body = json!({ "Consumers": consumers });
        if let Some(token) = next_token {
            body["NextToken"] = json!(token);
        }
        body.to_string()
    }

    /// AWS JSON error body.
    pub fn error_json(code: &str, message: &str) -> String {
        json!({
            "__type": code,
            "message": message,
        })
        .to_string()
    }

    /// Sample tags.
    pub fn sample_tags() -> Vec<Tag> {
        vec![Tag::new("Environment", "Test"), Tag::new("Team", "Data")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ListStreamConsumersOutput, ListStreamsOutput, ListTagsForStreamOutput};

    #[test]
    fn test_fixtures_decode() {
        let streams: ListStreamsOutput =
            serde_json::from_str(&TestFixtures::list_streams_json(&["a", "b"], Some("T1")))
                .unwrap();
        assert_eq!(streams.stream_names, vec!["a", "b"]);
        assert_eq!(streams.next_token.as_deref(), Some("T1"));

        let tags: ListTagsForStreamOutput =
            serde_json::from_str(&TestFixtures::list_tags_json(&[("k", "v")], false)).unwrap();
        assert_eq!(tags.tags, vec![Tag::new("k", "v")]);

        let consumers: ListStreamConsumersOutput =
            serde_json::from_str(&TestFixtures::list_consumers_json(&["c1"], None)).unwrap();
        assert_eq!(consumers.consumers[0].consumer_name, "c1");
        assert!(consumers.next_token.is_none());
    }
}
