//! Request types for the listing operations.
//!
//! Each request is serialized as the JSON body of one page fetch; the
//! pagination fields are filled in per page by the service.

use super::common::ListStreamsCursor;
use serde::Serialize;

/// Largest `Limit` accepted by `ListTagsForStream`.
pub const MAX_TAGS_PAGE_LIMIT: u32 = 50;

/// Request to list stream names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStreamsRequest {
    /// Maximum names per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Start listing after this stream name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_stream_name: Option<String>,
    /// Server continuation token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ListStreamsRequest {
    /// List all streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Start after the given stream name.
    pub fn with_exclusive_start(mut self, stream_name: impl Into<String>) -> Self {
        self.exclusive_start_stream_name = Some(stream_name.into());
        self
    }

    /// Copy of this request positioned at `cursor`.
    ///
    /// `NextToken` cannot be combined with the other filters, so they are
    /// cleared when resuming from a server token.
    pub fn at(&self, cursor: Option<&ListStreamsCursor>) -> Self {
        match cursor {
            None => self.clone(),
            Some(ListStreamsCursor::NextToken(token)) => Self {
                limit: self.limit,
                exclusive_start_stream_name: None,
                next_token: Some(token.clone()),
            },
            Some(ListStreamsCursor::ExclusiveStart(name)) => Self {
                limit: self.limit,
                exclusive_start_stream_name: Some(name.clone()),
                next_token: None,
            },
        }
    }
}

/// Request to list the tags of one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForStreamRequest {
    /// Stream name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_name: Option<String>,
    /// Stream ARN; takes precedence server-side over the name.
    #[serde(rename = "StreamARN", skip_serializing_if = "Option::is_none")]
    pub stream_arn: Option<String>,
    /// Maximum tags per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Start listing after this tag key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_tag_key: Option<String>,
}

impl ListTagsForStreamRequest {
    /// List the tags of the named stream.
    pub fn for_stream(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: Some(stream_name.into()),
            ..Default::default()
        }
    }

    /// List the tags of the stream with this ARN.
    pub fn for_stream_arn(stream_arn: impl Into<String>) -> Self {
        Self {
            stream_arn: Some(stream_arn.into()),
            ..Default::default()
        }
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Copy of this request resuming after `tag_key`.
    pub fn at(&self, tag_key: Option<&String>) -> Self {
        let mut request = self.clone();
        if let Some(key) = tag_key {
            request.exclusive_start_tag_key = Some(key.clone());
        }
        request
    }
}

/// Request to list the consumers registered with a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStreamConsumersRequest {
    /// Stream ARN.
    #[serde(rename = "StreamARN")]
    pub stream_arn: String,
    /// Maximum consumers per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    /// Server continuation token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ListStreamConsumersRequest {
    /// List the consumers of the stream with this ARN.
    pub fn new(stream_arn: impl Into<String>) -> Self {
        Self {
            stream_arn: stream_arn.into(),
            ..Default::default()
        }
    }

    /// Set the page size.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Copy of this request positioned at `token`.
    pub fn at(&self, token: Option<&String>) -> Self {
        let mut request = self.clone();
        if let Some(token) = token {
            request.next_token = Some(token.clone());
        }
        request
    }
}
