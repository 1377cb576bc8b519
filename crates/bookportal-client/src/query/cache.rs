//! Key-addressed query cache with single-flight fetches.
//!
//! Each entry moves through `absent -> fetching -> fresh -> stale -> fetching`.
//! At most one fetch per key is in flight. Every fetch runs as its own task
//! and readers await a shared handle to it, so a reader that gives up does
//! not leave the key stuck in `fetching`. A fetch writes its result back only
//! if it is still the current fetch for its key, so responses that arrive
//! after an invalidation, cancellation or direct overwrite are dropped.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bookportal_config::CacheConfig;
use bookportal_core::{ClientError, Result};
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::key::QueryKey;

type SharedFetch = Shared<BoxFuture<'static, Result<Value>>>;

/// How a read was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Fresh,
    /// Served from cache past its staleness window or after invalidation.
    Stale { refetching: bool },
}

/// Result of a stale-while-revalidate read.
#[derive(Debug, Clone)]
pub struct QueryResult<T> {
    pub data: T,
    pub status: QueryStatus,
    /// Set when the last refresh of this entry failed.
    pub error: Option<ClientError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Absent,
    Fetching,
    Fresh,
    Stale,
}

/// Observable state of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryState {
    pub status: EntryStatus,
    pub has_data: bool,
    pub error: Option<ClientError>,
}

impl EntryState {
    fn absent() -> Self {
        Self {
            status: EntryStatus::Absent,
            has_data: false,
            error: None,
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of entries currently in the cache.
    pub size: usize,
    /// Reads served from cached data.
    pub hits: u64,
    /// Reads that had to start a fetch.
    pub misses: u64,
    /// Network fetches started.
    pub fetches: u64,
    /// Reads that joined an in-flight fetch.
    pub joins: u64,
    /// Entries marked stale by invalidation.
    pub invalidations: u64,
    /// Entries dropped by `cleanup_expired`.
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

struct InFlight {
    seq: u64,
    future: SharedFetch,
    task: AbortHandle,
}

struct Entry {
    value: Option<Value>,
    updated_at: Instant,
    last_access: Instant,
    invalidated: bool,
    error: Option<ClientError>,
    in_flight: Option<InFlight>,
}

impl Entry {
    fn new(now: Instant) -> Self {
        Self {
            value: None,
            updated_at: now,
            last_access: now,
            invalidated: false,
            error: None,
            in_flight: None,
        }
    }

    fn is_stale(&self, now: Instant, window: Duration) -> bool {
        self.invalidated || now.duration_since(self.updated_at) >= window
    }

    /// Forget the in-flight fetch. It still answers its waiters but its
    /// result is no longer stored.
    fn detach(&mut self) -> bool {
        self.in_flight.take().is_some()
    }

    /// Stop the in-flight fetch. Its waiters get a cancellation error.
    fn abort(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.task.abort();
                true
            }
            None => false,
        }
    }

    fn is_empty(&self) -> bool {
        self.value.is_none() && self.in_flight.is_none()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    /// Wait for a refetch when the cached value is stale.
    Fetch,
    /// Serve a stale value and refetch in the background.
    Revalidate,
}

enum Read {
    Fresh(Value),
    Stale {
        value: Value,
        error: Option<ClientError>,
    },
    Wait(SharedFetch),
}

struct Inner {
    entries: DashMap<QueryKey, Entry>,
    list_stale_time: Duration,
    stats_stale_time: Duration,
    gc_time: Duration,
    next_seq: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
    joins: AtomicU64,
    invalidations: AtomicU64,
    evictions: AtomicU64,
}

impl Inner {
    /// Store the outcome of fetch `seq` if it is still the current one.
    fn complete(&self, key: &QueryKey, seq: u64, result: &Result<Value>) {
        let now = Instant::now();
        {
            let Some(mut entry) = self.entries.get_mut(key) else {
                debug!(%key, "discarding response for removed entry");
                return;
            };
            if entry.in_flight.as_ref().map(|f| f.seq) != Some(seq) {
                debug!(%key, "discarding superseded response");
                return;
            }
            entry.in_flight = None;
            match result {
                Ok(value) => {
                    entry.value = Some(value.clone());
                    entry.updated_at = now;
                    entry.invalidated = false;
                    entry.error = None;
                    return;
                }
                Err(e) if entry.value.is_some() => {
                    warn!(%key, error = %e, "refresh failed, keeping cached data");
                    entry.error = Some(e.clone());
                    return;
                }
                Err(e) => {
                    debug!(%key, error = %e, "fetch failed with nothing cached");
                }
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_empty());
    }
}

/// Process-wide query cache. Clones share the same entries.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.inner.entries.len())
            .field("list_stale_time", &self.inner.list_stale_time)
            .field("stats_stale_time", &self.inner.stats_stale_time)
            .finish()
    }
}

impl QueryClient {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                list_stale_time: config.list_stale_time,
                stats_stale_time: config.stats_stale_time,
                gc_time: config.gc_time,
                next_seq: AtomicU64::new(0),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                fetches: AtomicU64::new(0),
                joins: AtomicU64::new(0),
                invalidations: AtomicU64::new(0),
                evictions: AtomicU64::new(0),
            }),
        }
    }

    /// Staleness window that applies to `key`.
    pub fn stale_time(&self, key: &QueryKey) -> Duration {
        if key.is_aggregate() {
            self.inner.stats_stale_time
        } else {
            self.inner.list_stale_time
        }
    }

    /// Read `key`, fetching when nothing fresh is cached.
    ///
    /// Concurrent calls for the same key share one fetch. `fetcher` is only
    /// invoked when this call starts that fetch.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let value = match self.read(key, fetcher, ReadMode::Fetch) {
            Read::Fresh(value) => value,
            Read::Wait(fetch) => fetch.await?,
            // not produced in fetch mode
            Read::Stale { value, .. } => value,
        };
        decode(value)
    }

    /// Stale-while-revalidate read.
    ///
    /// A fresh value is returned as is. A stale value is returned immediately
    /// while one background refetch runs. Only an absent entry waits for the
    /// network.
    pub async fn get_or_revalidate<T, F, Fut>(
        &self,
        key: &QueryKey,
        fetcher: F,
    ) -> Result<QueryResult<T>>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        match self.read(key, fetcher, ReadMode::Revalidate) {
            Read::Fresh(value) => Ok(QueryResult {
                data: decode(value)?,
                status: QueryStatus::Fresh,
                error: None,
            }),
            Read::Stale { value, error } => Ok(QueryResult {
                data: decode(value)?,
                status: QueryStatus::Stale { refetching: true },
                error,
            }),
            Read::Wait(fetch) => Ok(QueryResult {
                data: decode(fetch.await?)?,
                status: QueryStatus::Fresh,
                error: None,
            }),
        }
    }

    /// Cached value for `key` regardless of staleness. Never fetches.
    pub fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.inner.entries.get(key)?.value.clone()?;
        serde_json::from_value(value).ok()
    }

    /// Overwrite `key` with `data` as a fresh value.
    ///
    /// A fetch in flight for the key is detached and its response discarded.
    pub fn set_query_data<T: Serialize>(&self, key: &QueryKey, data: &T) -> Result<()> {
        let value = serde_json::to_value(data).map_err(|e| ClientError::decode(e.to_string()))?;
        let now = Instant::now();
        let mut entry = self
            .inner
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));
        entry.detach();
        entry.value = Some(value);
        entry.updated_at = now;
        entry.last_access = now;
        entry.invalidated = false;
        entry.error = None;
        debug!(%key, "cache entry overwritten");
        Ok(())
    }

    /// Mark every entry under `prefix` stale. Nothing is refetched until the
    /// next read. Returns the number of entries marked.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut marked = 0;
        for mut entry in self.inner.entries.iter_mut() {
            if entry.key().starts_with(prefix) {
                entry.invalidated = true;
                entry.detach();
                marked += 1;
            }
        }
        self.inner.entries.retain(|_, entry| !entry.is_empty());
        self.inner
            .invalidations
            .fetch_add(marked as u64, Ordering::Relaxed);
        debug!(%prefix, marked, "cache invalidated");
        marked
    }

    /// Abort in-flight fetches under `prefix`. Cached values are kept.
    /// Returns the number of fetches cancelled.
    pub fn cancel(&self, prefix: &QueryKey) -> usize {
        let mut cancelled = 0;
        for mut entry in self.inner.entries.iter_mut() {
            if entry.key().starts_with(prefix) && entry.abort() {
                cancelled += 1;
            }
        }
        self.inner.entries.retain(|_, entry| !entry.is_empty());
        if cancelled > 0 {
            debug!(%prefix, cancelled, "in-flight fetches cancelled");
        }
        cancelled
    }

    /// Remove every entry under `prefix`.
    pub fn remove(&self, prefix: &QueryKey) -> usize {
        let mut removed = 0;
        self.inner.entries.retain(|key, entry| {
            if key.starts_with(prefix) {
                entry.abort();
                removed += 1;
                false
            } else {
                true
            }
        });
        debug!(%prefix, removed, "cache entries removed");
        removed
    }

    pub fn clear(&self) {
        self.inner.entries.retain(|_, entry| {
            entry.abort();
            false
        });
        debug!("cache cleared");
    }

    /// Drop idle entries not read for longer than the configured GC time.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let gc_time = self.inner.gc_time;
        let mut removed = 0;

        self.inner.entries.retain(|_, entry| {
            if entry.in_flight.is_none() && now.duration_since(entry.last_access) >= gc_time {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            self.inner
                .evictions
                .fetch_add(removed as u64, Ordering::Relaxed);
        }

        removed
    }

    pub fn state(&self, key: &QueryKey) -> EntryState {
        let Some(entry) = self.inner.entries.get(key) else {
            return EntryState::absent();
        };
        let now = Instant::now();
        let status = if entry.in_flight.is_some() {
            EntryStatus::Fetching
        } else if entry.value.is_none() {
            EntryStatus::Absent
        } else if entry.is_stale(now, self.stale_time(key)) {
            EntryStatus::Stale
        } else {
            EntryStatus::Fresh
        };
        EntryState {
            status,
            has_data: entry.value.is_some(),
            error: entry.error.clone(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.inner.entries.len(),
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            fetches: self.inner.fetches.load(Ordering::Relaxed),
            joins: self.inner.joins.load(Ordering::Relaxed),
            invalidations: self.inner.invalidations.load(Ordering::Relaxed),
            evictions: self.inner.evictions.load(Ordering::Relaxed),
        }
    }

    fn read<T, F, Fut>(&self, key: &QueryKey, fetcher: F, mode: ReadMode) -> Read
    where
        T: Serialize + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let now = Instant::now();
        let window = self.stale_time(key);
        let mut entry = self
            .inner
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));
        entry.last_access = now;

        if let Some(value) = &entry.value
            && !entry.is_stale(now, window)
        {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            debug!(%key, "cache hit");
            return Read::Fresh(value.clone());
        }

        if mode == ReadMode::Revalidate
            && let Some(value) = entry.value.clone()
        {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            let error = entry.error.clone();
            if entry.in_flight.is_none() {
                debug!(%key, "serving stale data, revalidating");
                self.start_fetch(key, &mut entry, fetcher);
            }
            return Read::Stale { value, error };
        }

        if let Some(in_flight) = &entry.in_flight {
            self.inner.joins.fetch_add(1, Ordering::Relaxed);
            debug!(%key, "joining in-flight fetch");
            return Read::Wait(in_flight.future.clone());
        }

        self.inner.misses.fetch_add(1, Ordering::Relaxed);
        debug!(%key, "cache miss");
        Read::Wait(self.start_fetch(key, &mut entry, fetcher))
    }

    fn start_fetch<T, F, Fut>(&self, key: &QueryKey, entry: &mut Entry, fetcher: F) -> SharedFetch
    where
        T: Serialize + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let inner = Arc::clone(&self.inner);
        let owned_key = key.clone();
        let task = tokio::spawn(async move {
            let result = match fetcher().await {
                Ok(data) => {
                    serde_json::to_value(&data).map_err(|e| ClientError::decode(e.to_string()))
                }
                Err(e) => Err(e),
            };
            inner.complete(&owned_key, seq, &result);
            result
        });
        let abort = task.abort_handle();
        let fetch = async move {
            task.await
                .unwrap_or_else(|e| Err(ClientError::network(format!("fetch cancelled: {e}"))))
        }
        .boxed()
        .shared();

        entry.in_flight = Some(InFlight {
            seq,
            future: fetch.clone(),
            task: abort,
        });
        self.inner.fetches.fetch_add(1, Ordering::Relaxed);
        fetch
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ClientError::decode(e.to_string()))
}
