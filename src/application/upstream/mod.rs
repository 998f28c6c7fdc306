//! Third-party feeds proxied through a time-based in-process cache.

pub mod letterboxd;
pub mod rawg;

use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use metrics::{counter, histogram};
use thiserror::Error;
use tracing::{debug, warn};

pub const METRIC_CACHE_HIT: &str = "folio_upstream_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "folio_upstream_cache_miss_total";
pub const METRIC_CACHE_STALE: &str = "folio_upstream_cache_stale_total";
pub const METRIC_FETCH_MS: &str = "folio_upstream_fetch_ms";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream responded with status {status}")]
    Status { status: u16 },
    #[error("upstream request failed")]
    Transport(#[source] reqwest::Error),
    #[error("upstream payload could not be parsed: {0}")]
    Malformed(String),
    #[error("upstream credentials are not configured")]
    NotConfigured,
}

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<V> {
    Fresh(V),
    Stale(V),
    Missing,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Per-key `(value, expiry)` store with lazy refresh and stale fallback.
///
/// Entries are never evicted. Concurrent misses may fetch twice; the last
/// successful write wins.
pub struct FeedCache<K, V> {
    feed: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: DashMap<K, CacheEntry<V>>,
}

impl<K, V> FeedCache<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    pub fn new(feed: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            feed,
            ttl,
            clock,
            entries: DashMap::new(),
        }
    }

    pub fn lookup(&self, key: &K) -> CacheLookup<V> {
        let now = self.clock.now();
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => CacheLookup::Fresh(entry.value.clone()),
            Some(entry) => CacheLookup::Stale(entry.value.clone()),
            None => CacheLookup::Missing,
        }
    }

    pub fn store(&self, key: K, value: V) {
        let expires_at = self.clock.now() + self.ttl;
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Serve a fresh entry, otherwise fetch and store. A failed fetch falls
    /// back to whatever was cached before; with nothing cached the error
    /// surfaces.
    pub async fn get_or_refresh<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        let previous = match self.lookup(&key) {
            CacheLookup::Fresh(value) => {
                counter!(METRIC_CACHE_HIT, "feed" => self.feed).increment(1);
                return Ok(value);
            }
            CacheLookup::Stale(value) => Some(value),
            CacheLookup::Missing => None,
        };

        counter!(METRIC_CACHE_MISS, "feed" => self.feed).increment(1);
        let started_at = Instant::now();
        let result = fetch().await;
        histogram!(METRIC_FETCH_MS, "feed" => self.feed)
            .record(started_at.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(value) => {
                debug!(target = "folio::upstream", feed = self.feed, %key, "refreshed cache entry");
                self.store(key, value.clone());
                Ok(value)
            }
            Err(err) => match previous {
                Some(value) => {
                    counter!(METRIC_CACHE_STALE, "feed" => self.feed).increment(1);
                    warn!(
                        target = "folio::upstream",
                        feed = self.feed,
                        %key,
                        error = %err,
                        "upstream refresh failed; serving stale entry"
                    );
                    Ok(value)
                }
                None => Err(err),
            },
        }
    }
}

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Send the request and reject non-2xx responses.
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, UpstreamError> {
    let response = request.send().await.map_err(UpstreamError::Transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Clock that only moves when told to.
    pub struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().expect("clock lock");
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().expect("clock lock")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::testing::ManualClock;
    use super::*;

    fn cache(clock: Arc<ManualClock>) -> FeedCache<String, u32> {
        FeedCache::new("test", Duration::from_secs(3600), clock)
    }

    #[tokio::test]
    async fn fresh_entries_skip_the_fetch() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(clock.clone());
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_refresh("k".to_string(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, UpstreamError>(7)
                })
                .await
                .expect("value");
            assert_eq!(value, 7);
            clock.advance(Duration::from_secs(60));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entries_are_refetched() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(clock.clone());
        cache.store("k".to_string(), 1);

        clock.advance(Duration::from_secs(3600));
        assert_eq!(cache.lookup(&"k".to_string()), CacheLookup::Stale(1));

        let value = cache
            .get_or_refresh("k".to_string(), || async { Ok::<_, UpstreamError>(2) })
            .await
            .expect("refreshed");
        assert_eq!(value, 2);
        assert_eq!(cache.lookup(&"k".to_string()), CacheLookup::Fresh(2));
    }

    #[tokio::test]
    async fn each_expiry_costs_one_fetch() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(clock.clone());
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            Ok::<_, UpstreamError>(calls.fetch_add(1, Ordering::SeqCst) as u32)
        };

        assert_eq!(cache.get_or_refresh("k".to_string(), fetch).await.expect("miss"), 0);
        clock.advance(Duration::from_secs(3601));
        assert_eq!(cache.get_or_refresh("k".to_string(), fetch).await.expect("expired"), 1);
        assert_eq!(cache.get_or_refresh("k".to_string(), fetch).await.expect("fresh"), 1);

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_value() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(clock.clone());
        cache.store("k".to_string(), 1);
        clock.advance(Duration::from_secs(7200));

        let value = cache
            .get_or_refresh("k".to_string(), || async {
                Err(UpstreamError::Status { status: 500 })
            })
            .await
            .expect("stale fallback");
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn failure_with_empty_cache_surfaces() {
        let cache = cache(Arc::new(ManualClock::new()));
        let err = cache
            .get_or_refresh("k".to_string(), || async {
                Err::<u32, _>(UpstreamError::Malformed("bad".into()))
            })
            .await
            .expect_err("nothing cached");
        assert!(matches!(err, UpstreamError::Malformed(_)));
        assert_eq!(cache.lookup(&"k".to_string()), CacheLookup::Missing);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = cache(Arc::new(ManualClock::new()));
        cache.store("a".to_string(), 1);
        assert_eq!(cache.lookup(&"b".to_string()), CacheLookup::Missing);
    }
}
