//! Stream listings: stream names, stream tags and registered consumers.
//!
//! Each `list_*` method returns a fresh lazy [`PageStream`]; nothing is sent
//! until it is first polled, and no state is shared between calls.

use super::{ApiInvoker, PageStream};
use crate::config::{KinesisConfig, ListingKind};
use crate::error::{KinesisError, RequestError};
use crate::pagination::{paginate, Page};
use crate::signing::RequestSigner;
use crate::transport::HttpTransport;
use crate::types::*;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info_span, instrument};
use tracing_futures::Instrument;

/// Service for the Kinesis listing operations.
#[derive(Clone, Debug)]
pub struct StreamsService {
    invoker: ApiInvoker,
}

impl StreamsService {
    /// Create a new streams service.
    pub fn new(
        config: Arc<KinesisConfig>,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn RequestSigner>,
    ) -> Self {
        Self {
            invoker: ApiInvoker::new(config, transport, signer),
        }
    }

    fn config(&self) -> &KinesisConfig {
        self.invoker.config()
    }

    /// Fetch one page of stream names.
    #[instrument(skip(self, request), fields(next_token = request.next_token.is_some()))]
    pub async fn list_streams_page(
        &self,
        mut request: ListStreamsRequest,
    ) -> Result<Page<String, ListStreamsCursor>, KinesisError> {
        if request.limit.is_none() {
            request.limit = self.config().page_limit;
        }

        let output: ListStreamsOutput = self
            .invoker
            .call(ListingKind::Streams.operation(), &request)
            .await?;
        Ok(output.into_page())
    }

    /// Stream every stream name, starting from `request`.
    pub fn list_streams(&self, request: ListStreamsRequest) -> PageStream<String> {
        let service = self.clone();
        let span = info_span!("kinesis.list_streams");
        debug!(limit = ?request.limit, "Listing streams");

        paginate(
            move |cursor: Option<ListStreamsCursor>| {
                let service = service.clone();
                let request = request.at(cursor.as_ref());
                async move { service.list_streams_page(request).await }
            },
            self.config().backoff_policy(),
            self.config().throttle_for(ListingKind::Streams),
        )
        .instrument(span)
        .boxed()
    }

    /// Fetch one page of tags for a stream.
    #[instrument(skip(self, request), fields(
        stream = request.stream_name.as_deref().or(request.stream_arn.as_deref()).unwrap_or("")
    ))]
    pub async fn list_tags_page(
        &self,
        mut request: ListTagsForStreamRequest,
    ) -> Result<Page<Tag, String>, KinesisError> {
        if request.stream_name.is_none() && request.stream_arn.is_none() {
            return Err(RequestError::MissingParameter {
                name: "StreamName".to_string(),
            }
            .into());
        }
        let limit = request.limit.or(self.config().page_limit);
        request.limit = limit.map(|l| l.min(MAX_TAGS_PAGE_LIMIT));

        let output: ListTagsForStreamOutput = self
            .invoker
            .call(ListingKind::Tags.operation(), &request)
            .await?;
        Ok(output.into_page())
    }

    /// Stream every tag of a stream.
    pub fn list_tags(&self, request: ListTagsForStreamRequest) -> PageStream<Tag> {
        let service = self.clone();
        let span = info_span!(
            "kinesis.list_tags",
            stream = request
                .stream_name
                .as_deref()
                .or(request.stream_arn.as_deref())
                .unwrap_or("")
        );

        paginate(
            move |tag_key: Option<String>| {
                let service = service.clone();
                let request = request.at(tag_key.as_ref());
                async move { service.list_tags_page(request).await }
            },
            self.config().backoff_policy(),
            self.config().throttle_for(ListingKind::Tags),
        )
        .instrument(span)
        .boxed()
    }

    /// Fetch one page of consumers registered with a stream.
    #[instrument(skip(self, request), fields(stream_arn = %request.stream_arn))]
    pub async fn list_consumers_page(
        &self,
        mut request: ListStreamConsumersRequest,
    ) -> Result<Page<Consumer, String>, KinesisError> {
        if request.stream_arn.trim().is_empty() {
            return Err(RequestError::MissingParameter {
                name: "StreamARN".to_string(),
            }
            .into());
        }
        if request.max_results.is_none() {
            request.max_results = self.config().page_limit;
        }

        let output: ListStreamConsumersOutput = self
            .invoker
            .call(ListingKind::Consumers.operation(), &request)
            .await?;
        Ok(output.into_page())
    }

    /// Stream every consumer registered with a stream.
    pub fn list_consumers(&self, request: ListStreamConsumersRequest) -> PageStream<Consumer> {
        let service = self.clone();
        let span = info_span!("kinesis.list_consumers", stream_arn = %request.stream_arn);

        paginate(
            move |token: Option<String>| {
                let service = service.clone();
                let request = request.at(token.as_ref());
                async move { service.list_consumers_page(request).await }
            },
            self.config().backoff_policy(),
            self.config().throttle_for(ListingKind::Consumers),
        )
        .instrument(span)
        .boxed()
    }
}
