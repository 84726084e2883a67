//! Integration tests for the paginated stream combinator.

use aws_kinesis::pagination::{paginate, BackoffPolicy, Page, ThrottlePolicy, TransientError};
use futures::{StreamExt, TryStreamExt};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
enum TestError {
    Throttled,
    Fatal,
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::Throttled => write!(f, "throttled"),
            TestError::Fatal => write!(f, "fatal"),
        }
    }
}

impl TransientError for TestError {
    fn is_transient(&self) -> bool {
        matches!(self, TestError::Throttled)
    }
}

type Reply = Result<Page<&'static str>, TestError>;

/// Replays scripted replies and records every fetch.
#[derive(Default)]
struct Script {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(Option<String>, Instant)>>,
    latency: Duration,
}

impl Script {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    fn with_latency(replies: Vec<Reply>, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            latency,
            ..Default::default()
        })
    }

    fn tokens(&self) -> Vec<Option<String>> {
        self.calls.lock().iter().map(|(t, _)| t.clone()).collect()
    }

    fn starts(&self) -> Vec<Instant> {
        self.calls.lock().iter().map(|(_, at)| *at).collect()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

fn fetcher(
    script: Arc<Script>,
) -> impl FnMut(Option<String>) -> futures::future::BoxFuture<'static, Reply> {
    move |token| {
        let script = script.clone();
        Box::pin(async move {
            script.calls.lock().push((token, Instant::now()));
            if !script.latency.is_zero() {
                tokio::time::sleep(script.latency).await;
            }
            let reply = script.replies.lock().pop_front();
            reply.unwrap_or(Err(TestError::Fatal))
        })
    }
}

fn page(items: Vec<&'static str>, next: &str) -> Reply {
    Ok(Page::new(items, Some(next.to_string())))
}

fn last(items: Vec<&'static str>) -> Reply {
    Ok(Page::last(items))
}

fn fast_backoff(max_attempts: u32) -> BackoffPolicy {
    BackoffPolicy::new(max_attempts)
        .with_initial_delay(Duration::from_millis(100))
        .with_multiplier(2.0)
        .with_jitter(false)
}

#[tokio::test(start_paused = true)]
async fn test_three_items_across_two_pages() {
    let script = Script::new(vec![page(vec!["a", "b"], "T1"), last(vec!["c"])]);

    let items: Vec<&str> = paginate(
        fetcher(script.clone()),
        BackoffPolicy::default(),
        ThrottlePolicy::default(),
    )
    .try_collect()
    .await
    .unwrap();

    assert_eq!(items, vec!["a", "b", "c"]);
    assert_eq!(script.tokens(), vec![None, Some("T1".to_string())]);

    let starts = script.starts();
    assert!(starts[1] - starts[0] >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_tokens_are_threaded_exactly() {
    let script = Script::new(vec![
        page(vec!["1"], "alpha"),
        page(vec!["2"], "beta"),
        page(vec!["3"], "gamma"),
        last(vec!["4"]),
    ]);

    let items: Vec<&str> = paginate(
        fetcher(script.clone()),
        BackoffPolicy::no_retry(),
        ThrottlePolicy::none(),
    )
    .try_collect()
    .await
    .unwrap();

    assert_eq!(items, vec!["1", "2", "3", "4"]);
    assert_eq!(
        script.tokens(),
        vec![
            None,
            Some("alpha".to_string()),
            Some("beta".to_string()),
            Some("gamma".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_empty_first_page_is_empty_sequence() {
    let script = Script::new(vec![last(vec![])]);

    let items: Vec<&str> = paginate(
        fetcher(script.clone()),
        BackoffPolicy::default(),
        ThrottlePolicy::none(),
    )
    .try_collect()
    .await
    .unwrap();

    assert!(items.is_empty());
    assert_eq!(script.call_count(), 1);
}

#[tokio::test]
async fn test_no_fetch_after_last_page() {
    let script = Script::new(vec![page(vec!["a"], "T1"), last(vec!["b"])]);
    let mut stream = Box::pin(paginate(
        fetcher(script.clone()),
        BackoffPolicy::default(),
        ThrottlePolicy::none(),
    ));

    assert_eq!(stream.next().await, Some(Ok("a")));
    assert_eq!(stream.next().await, Some(Ok("b")));
    assert_eq!(stream.next().await, None);
    assert_eq!(stream.next().await, None);
    assert_eq!(script.call_count(), 2);
}

#[tokio::test]
async fn test_no_fetch_before_first_poll() {
    let script = Script::new(vec![last(vec!["a"])]);
    let stream = paginate(
        fetcher(script.clone()),
        BackoffPolicy::default(),
        ThrottlePolicy::none(),
    );

    tokio::task::yield_now().await;
    assert_eq!(script.call_count(), 0);
    drop(stream);
    assert_eq!(script.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_retry_same_token() {
    let script = Script::new(vec![
        page(vec!["a"], "T1"),
        Err(TestError::Throttled),
        Err(TestError::Throttled),
        last(vec!["b"]),
    ]);

    let items: Vec<&str> = paginate(
        fetcher(script.clone()),
        fast_backoff(5),
        ThrottlePolicy::none(),
    )
    .try_collect()
    .await
    .unwrap();

    assert_eq!(items, vec!["a", "b"]);
    assert_eq!(
        script.tokens(),
        vec![
            None,
            Some("T1".to_string()),
            Some("T1".to_string()),
            Some("T1".to_string()),
        ]
    );

    let starts = script.starts();
    let first_wait = starts[2] - starts[1];
    let second_wait = starts[3] - starts[2];
    assert!(first_wait >= Duration::from_millis(100));
    assert!(first_wait < Duration::from_millis(150));
    assert!(second_wait >= Duration::from_millis(200));
    assert!(second_wait < Duration::from_millis(250));
}

#[tokio::test(start_paused = true)]
async fn test_retry_exhaustion_surfaces_last_error() {
    let script = Script::new(vec![Err(TestError::Throttled); 10]);
    let mut stream = Box::pin(paginate(
        fetcher(script.clone()),
        fast_backoff(5),
        ThrottlePolicy::none(),
    ));

    assert_eq!(stream.next().await, Some(Err(TestError::Throttled)));
    assert_eq!(stream.next().await, None);
    assert_eq!(script.call_count(), 5);
    assert!(script.tokens().iter().all(Option::is_none));
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_error_fails_immediately() {
    let script = Script::new(vec![Err(TestError::Fatal), last(vec!["never"])]);
    let mut stream = Box::pin(paginate(
        fetcher(script.clone()),
        fast_backoff(5),
        ThrottlePolicy::default(),
    ));

    assert_eq!(stream.next().await, Some(Err(TestError::Fatal)));
    assert_eq!(stream.next().await, None);
    assert_eq!(script.call_count(), 1);
}

#[tokio::test]
async fn test_items_before_failure_stay_delivered() {
    let script = Script::new(vec![page(vec!["a", "b"], "T1"), Err(TestError::Fatal)]);
    let results: Vec<Result<&str, TestError>> = paginate(
        fetcher(script.clone()),
        BackoffPolicy::default(),
        ThrottlePolicy::none(),
    )
    .collect()
    .await;

    assert_eq!(results, vec![Ok("a"), Ok("b"), Err(TestError::Fatal)]);
    assert_eq!(script.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_throttle_spaces_fetch_starts() {
    let script = Script::new(vec![
        page(vec!["a"], "T1"),
        page(vec!["b"], "T2"),
        page(vec!["c"], "T3"),
        last(vec!["d"]),
    ]);

    let items: Vec<&str> = paginate(
        fetcher(script.clone()),
        BackoffPolicy::default(),
        ThrottlePolicy::new(Duration::from_millis(200)),
    )
    .try_collect()
    .await
    .unwrap();

    assert_eq!(items.len(), 4);
    for pair in script.starts().windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(200));
    }
}

#[tokio::test(start_paused = true)]
async fn test_throttle_measured_from_fetch_start() {
    let script = Script::with_latency(
        vec![page(vec!["a"], "T1"), last(vec!["b"])],
        Duration::from_millis(150),
    );

    let _: Vec<&str> = paginate(
        fetcher(script.clone()),
        BackoffPolicy::default(),
        ThrottlePolicy::new(Duration::from_millis(200)),
    )
    .try_collect()
    .await
    .unwrap();

    let starts = script.starts();
    let gap = starts[1] - starts[0];
    assert!(gap >= Duration::from_millis(200));
    assert!(gap < Duration::from_millis(350));
}

#[tokio::test(start_paused = true)]
async fn test_slow_fetch_needs_no_extra_throttle_wait() {
    let script = Script::with_latency(
        vec![page(vec!["a"], "T1"), last(vec!["b"])],
        Duration::from_millis(500),
    );

    let _: Vec<&str> = paginate(
        fetcher(script.clone()),
        BackoffPolicy::default(),
        ThrottlePolicy::new(Duration::from_millis(200)),
    )
    .try_collect()
    .await
    .unwrap();

    let starts = script.starts();
    let gap = starts[1] - starts[0];
    assert!(gap >= Duration::from_millis(500));
    assert!(gap < Duration::from_millis(550));
}

#[tokio::test(start_paused = true)]
async fn test_throttle_not_applied_before_retry() {
    let script = Script::new(vec![Err(TestError::Throttled), last(vec!["a"])]);
    let backoff = BackoffPolicy::new(3)
        .with_initial_delay(Duration::from_millis(10))
        .with_jitter(false);

    let _: Vec<&str> = paginate(
        fetcher(script.clone()),
        backoff,
        ThrottlePolicy::new(Duration::from_secs(1)),
    )
    .try_collect()
    .await
    .unwrap();

    let starts = script.starts();
    assert!(starts[1] - starts[0] < Duration::from_millis(100));
}

#[tokio::test]
async fn test_dropping_stream_stops_fetching() {
    let calls = Arc::new(Mutex::new(0u32));
    let counter = calls.clone();

    let taken: Vec<u32> = paginate(
        move |token: Option<u32>| {
            let counter = counter.clone();
            async move {
                *counter.lock() += 1;
                let n = token.unwrap_or(0);
                Ok::<_, TestError>(Page::new(vec![n * 10, n * 10 + 1], Some(n + 1)))
            }
        },
        BackoffPolicy::default(),
        ThrottlePolicy::none(),
    )
    .take(3)
    .try_collect()
    .await
    .unwrap();

    assert_eq!(taken, vec![0, 1, 10]);
    tokio::task::yield_now().await;
    assert_eq!(*calls.lock(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_stream_mid_fetch_starts_no_further_fetch() {
    let script = Script::with_latency(
        vec![page(vec!["a"], "T1"), page(vec!["b"], "T2"), last(vec!["c"])],
        Duration::from_secs(1),
    );

    let mut stream = Box::pin(paginate(
        fetcher(script.clone()),
        BackoffPolicy::default(),
        ThrottlePolicy::none(),
    ));

    assert_eq!(stream.next().await, Some(Ok("a")));
    assert_eq!(script.call_count(), 1);

    let in_flight = tokio::time::timeout(Duration::from_millis(100), stream.next()).await;
    assert!(in_flight.is_err());
    assert_eq!(script.call_count(), 2);

    drop(stream);
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(script.call_count(), 2);
    assert_eq!(script.tokens(), vec![None, Some("T1".to_string())]);
}

#[tokio::test]
async fn test_unbounded_listing_buffers_one_page() {
    let calls = Arc::new(Mutex::new(0u32));
    let counter = calls.clone();

    let taken: Vec<u32> = paginate(
        move |token: Option<u32>| {
            let counter = counter.clone();
            async move {
                *counter.lock() += 1;
                let n = token.unwrap_or(0);
                Ok::<_, TestError>(Page::new((n * 10..n * 10 + 10).collect(), Some(n + 1)))
            }
        },
        BackoffPolicy::default(),
        ThrottlePolicy::none(),
    )
    .take(25)
    .try_collect()
    .await
    .unwrap();

    assert_eq!(taken, (0..25).collect::<Vec<_>>());
    assert_eq!(*calls.lock(), 3);
}

proptest! {
    #[test]
    fn prop_output_is_concatenation_of_pages(
        pages in prop::collection::vec(prop::collection::vec(any::<u16>(), 0..8), 1..8)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        let expected: Vec<u16> = pages.iter().flatten().copied().collect();
        let page_count = pages.len();
        let served = pages.clone();

        let items: Vec<u16> = runtime
            .block_on(
                paginate(
                    move |token: Option<usize>| {
                        let index = token.unwrap_or(0);
                        let items = served[index].clone();
                        let next = (index + 1 < page_count).then_some(index + 1);
                        async move { Ok::<_, TestError>(Page::new(items, next)) }
                    },
                    BackoffPolicy::no_retry(),
                    ThrottlePolicy::none(),
                )
                .try_collect(),
            )
            .unwrap();

        prop_assert_eq!(items, expected);
    }
}
