//! Token-driven pagination as a lazy stream.
//!
//! Control-plane listings (streams, tags, consumers) return results one page
//! at a time together with an opaque continuation token. [`paginate`] turns a
//! page-fetching closure into a flat [`Stream`] of items:
//!
//! - fetches are strictly sequential; the token returned by page `N` is the
//!   token passed to the fetch of page `N + 1`
//! - a page without a continuation token ends the stream
//! - fetches rejected with a transient (rate-limit) error are re-issued with the
//!   same token under a [`BackoffPolicy`]; any other error ends the stream
//! - successive fetch starts are spaced by a [`ThrottlePolicy`]
//! - only the current page is buffered, and dropping the stream stops all
//!   further fetching
//!
//! # Example
//!
//! ```rust
//! use aws_kinesis::pagination::{paginate, BackoffPolicy, Page, ThrottlePolicy};
//! use futures::TryStreamExt;
//!
//! # async fn example() -> Result<(), aws_kinesis::KinesisError> {
//! let items: Vec<&str> = paginate(
//!     |token: Option<String>| async move {
//!         Ok::<_, aws_kinesis::KinesisError>(match token.as_deref() {
//!             None => Page::new(vec!["a", "b"], Some("T1".to_string())),
//!             Some(_) => Page::last(vec!["c"]),
//!         })
//!     },
//!     BackoffPolicy::default(),
//!     ThrottlePolicy::none(),
//! )
//! .try_collect()
//! .await?;
//!
//! assert_eq!(items, vec!["a", "b", "c"]);
//! # Ok(())
//! # }
//! ```

mod backoff;
mod throttle;

pub use backoff::BackoffPolicy;
pub use throttle::ThrottlePolicy;

use futures::stream::{self, Stream, StreamExt};
use std::fmt;
use std::future::Future;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Classifies errors the pagination layer may retry.
pub trait TransientError {
    /// Returns true if re-issuing the same request may succeed.
    fn is_transient(&self) -> bool;
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T, K = String> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Continuation token; `None` means no further pages.
    pub next: Option<K>,
}

impl<T, K> Page<T, K> {
    /// Creates a page.
    pub fn new(items: Vec<T>, next: Option<K>) -> Self {
        Self { items, next }
    }

    /// Creates the final page of a listing.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }

    /// Returns true if another page follows.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this page carries no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps the items, keeping the continuation token.
    pub fn map<U, F>(self, f: F) -> Page<U, K>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
        }
    }
}

enum Cursor<K> {
    Fetching(Option<K>),
    Done,
}

struct PageState<T, K, F> {
    fetcher: F,
    backoff: BackoffPolicy,
    throttle: ThrottlePolicy,
    cursor: Cursor<K>,
    buffered: std::vec::IntoIter<T>,
    last_started: Option<Instant>,
    pages: u64,
}

impl<T, K, F, Fut, E> PageState<T, K, F>
where
    F: FnMut(Option<K>) -> Fut,
    Fut: Future<Output = Result<Page<T, K>, E>>,
    K: Clone,
    E: TransientError + fmt::Display,
{
    async fn fetch_page(&mut self, token: Option<K>) -> Result<Page<T, K>, E> {
        if let Some(last) = self.last_started {
            let ready = self.throttle.ready_at(last);
            if ready > Instant::now() {
                trace!(
                    wait_ms = ready.saturating_duration_since(Instant::now()).as_millis() as u64,
                    "Throttling next page request"
                );
                tokio::time::sleep_until(ready).await;
            }
        }

        let mut attempts: u32 = 0;
        loop {
            self.last_started = Some(Instant::now());
            attempts += 1;

            match (self.fetcher)(token.clone()).await {
                Ok(page) => {
                    self.pages += 1;
                    trace!(
                        page = self.pages,
                        items = page.len(),
                        has_next = page.has_next(),
                        "Fetched page"
                    );
                    return Ok(page);
                }
                Err(error) => {
                    if !self.backoff.should_retry(attempts, &error) {
                        if error.is_transient() {
                            warn!(
                                attempts,
                                max_attempts = self.backoff.max_attempts,
                                error = %error,
                                "Page fetch still rate limited after all attempts"
                            );
                        }
                        return Err(error);
                    }

                    let delay = self.backoff.next_delay(attempts - 1);
                    debug!(
                        attempt = attempts,
                        backoff_ms = delay.as_millis() as u64,
                        error = %error,
                        "Page fetch rate limited, retrying same token"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Drive `fetcher` until the listing is exhausted, yielding items one by one.
///
/// The first fetch is issued with `None` on the first poll of the returned
/// stream. After an error is yielded the stream is exhausted; items already
/// yielded stay valid.
pub fn paginate<T, K, E, F, Fut>(
    fetcher: F,
    backoff: BackoffPolicy,
    throttle: ThrottlePolicy,
) -> impl Stream<Item = Result<T, E>>
where
    F: FnMut(Option<K>) -> Fut,
    Fut: Future<Output = Result<Page<T, K>, E>>,
    K: Clone,
    E: TransientError + fmt::Display,
{
    let state = PageState {
        fetcher,
        backoff,
        throttle,
        cursor: Cursor::Fetching(None),
        buffered: Vec::new().into_iter(),
        last_started: None,
        pages: 0,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.buffered.next() {
                return Some((Ok(item), state));
            }

            let token = match std::mem::replace(&mut state.cursor, Cursor::Done) {
                Cursor::Fetching(token) => token,
                Cursor::Done => return None,
            };

            match state.fetch_page(token).await {
                Ok(page) => {
                    if let Some(next) = page.next {
                        state.cursor = Cursor::Fetching(Some(next));
                    }
                    state.buffered = page.items.into_iter();
                }
                Err(error) => return Some((Err(error), state)),
            }
        }
    })
    .fuse()
}

/// Builder over [`paginate`].
pub struct Paginator<F> {
    fetcher: F,
    backoff: BackoffPolicy,
    throttle: ThrottlePolicy,
}

impl<F> Paginator<F> {
    /// Wrap a page fetcher with the default backoff and throttle.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            backoff: BackoffPolicy::default(),
            throttle: ThrottlePolicy::default(),
        }
    }

    /// Set the backoff policy.
    pub fn backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the throttle policy.
    pub fn throttle(mut self, throttle: ThrottlePolicy) -> Self {
        self.throttle = throttle;
        self
    }

    /// Turn the fetcher into an item stream.
    pub fn into_stream<T, K, E, Fut>(self) -> impl Stream<Item = Result<T, E>>
    where
        F: FnMut(Option<K>) -> Fut,
        Fut: Future<Output = Result<Page<T, K>, E>>,
        K: Clone,
        E: TransientError + fmt::Display,
    {
        paginate(self.fetcher, self.backoff, self.throttle)
    }
}

impl<F> fmt::Debug for Paginator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("backoff", &self.backoff)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}
