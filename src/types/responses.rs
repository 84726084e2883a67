//! Response types for the listing operations.

use super::common::{Consumer, ListStreamsCursor, Tag};
use crate::pagination::Page;
use serde::Deserialize;
use tracing::debug;

/// One page of `ListStreams`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStreamsOutput {
    /// Stream names in this page.
    #[serde(default)]
    pub stream_names: Vec<String>,
    /// Whether more streams follow.
    #[serde(default)]
    pub has_more_streams: bool,
    /// Server continuation token.
    #[serde(default)]
    pub next_token: Option<String>,
}

impl ListStreamsOutput {
    /// Convert into a page, choosing the cursor for the next fetch.
    ///
    /// A server token wins; otherwise `HasMoreStreams` resumes after the last
    /// name in this page.
    pub fn into_page(self) -> Page<String, ListStreamsCursor> {
        let next = match self.next_token {
            Some(token) => Some(ListStreamsCursor::NextToken(token)),
            None if self.has_more_streams => match self.stream_names.last() {
                Some(name) => Some(ListStreamsCursor::ExclusiveStart(name.clone())),
                None => {
                    debug!("HasMoreStreams set on an empty page without NextToken, ending listing");
                    None
                }
            },
            None => None,
        };
        Page::new(self.stream_names, next)
    }
}

/// One page of `ListTagsForStream`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForStreamOutput {
    /// Tags in this page.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Whether more tags follow.
    #[serde(default)]
    pub has_more_tags: bool,
}

impl ListTagsForStreamOutput {
    /// Convert into a page keyed by the last tag key.
    pub fn into_page(self) -> Page<Tag, String> {
        let next = if self.has_more_tags {
            self.tags.last().map(|tag| tag.key.clone())
        } else {
            None
        };
        Page::new(self.tags, next)
    }
}

/// One page of `ListStreamConsumers`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStreamConsumersOutput {
    /// Consumers in this page.
    #[serde(default)]
    pub consumers: Vec<Consumer>,
    /// Server continuation token.
    #[serde(default)]
    pub next_token: Option<String>,
}

impl ListStreamConsumersOutput {
    /// Convert into a page keyed by `NextToken`.
    pub fn into_page(self) -> Page<Consumer, String> {
        Page::new(self.consumers, self.next_token)
    }
}
