//! Query cache with request coalescing and invalidation
//!
//! A process-wide (but explicitly constructed and injected) keyed store of
//! in-flight and completed command results. Concurrent requests for the
//! same key share a single physical fetch through a per-entry broadcast
//! channel; invalidation marks entries stale and re-runs the stored
//! fetcher for subscribed keys, or evicts unobserved ones.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::{QueryError, QueryKey};

type SharedValue = Arc<dyn Any + Send + Sync>;
type FetchResult = Result<SharedValue, QueryError>;
type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, FetchResult> + Send + Sync>;

/// Lifecycle status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Tracked but not fetched (disabled gating, or a transport failure
    /// rolled the entry back).
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEventKind {
    Updated,
    Invalidated,
}

/// Notification delivered to subscribers of a key.
#[derive(Debug, Clone)]
pub struct QueryEvent {
    pub key: QueryKey,
    pub kind: QueryEventKind,
}

enum EntryState {
    Idle,
    Pending {
        done: broadcast::Sender<FetchResult>,
    },
    Ready {
        result: FetchResult,
        updated_at: Instant,
    },
}

struct Entry {
    state: EntryState,
    /// Latest fetcher seen for this key, re-run on invalidation while
    /// subscribed.
    fetcher: Option<Fetcher>,
    stale: bool,
    subscribers: usize,
}

impl Entry {
    fn idle() -> Self {
        Self {
            state: EntryState::Idle,
            fetcher: None,
            stale: false,
            subscribers: 0,
        }
    }
}

struct CacheInner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    events: broadcast::Sender<QueryEvent>,
}

/// Keyed store of command results. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

enum Plan {
    Hit(FetchResult),
    Wait(broadcast::Receiver<FetchResult>),
    Run(broadcast::Sender<FetchResult>),
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(CacheInner {
                entries: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Return the cached value for `key`, or run `fetcher` to produce it.
    ///
    /// Concurrent callers for the same key observe exactly one physical
    /// fetch and all receive the same resolved value or error. Command
    /// errors are cached; transport errors are raised to every waiter and
    /// leave the entry idle so the next access retries.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, QueryError>
    where
        T: Any + Send + Sync,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        let value = self.fetch_erased(key, erase_fetcher(fetcher)).await?;

        value
            .downcast::<T>()
            .map_err(|_| QueryError::Transport("cached value has an unexpected type".into()))
    }

    /// Track `key` without fetching it (the enabled=false state).
    ///
    /// The entry is created idle and the fetcher stored, so a later
    /// invalidation or an enabled [`fetch`](Self::fetch) picks it up.
    /// Disabled keys never count toward in-flight concurrency and never
    /// reach the backend.
    pub fn register<T, F, Fut>(&self, key: QueryKey, fetcher: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        let mut entries = self.inner.entries.lock();
        let entry = entries.entry(key).or_insert_with(Entry::idle);
        entry.fetcher = Some(erase_fetcher(fetcher));
    }

    /// Mark `key` stale.
    ///
    /// Subscribed entries transition back to pending and re-fetch exactly
    /// once; entries with zero subscribers are simply evicted. An entry
    /// with a fetch already in flight keeps that fetch running and stores
    /// its result as stale (logical, not physical, cancellation).
    pub fn invalidate(&self, key: &QueryKey) {
        let refetch = {
            let mut entries = self.inner.entries.lock();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };

            if matches!(entry.state, EntryState::Pending { .. }) {
                entry.stale = true;
                None
            } else if entry.subscribers == 0 {
                entries.remove(key);
                None
            } else if let Some(fetcher) = entry.fetcher.clone() {
                let (done, _) = broadcast::channel(1);
                entry.state = EntryState::Pending { done: done.clone() };
                entry.stale = false;
                Some((fetcher, done))
            } else {
                entry.stale = true;
                None
            }
        };

        self.emit(key, QueryEventKind::Invalidated);

        if let Some((fetcher, done)) = refetch {
            let cache = self.clone();
            let key = key.clone();
            tokio::spawn(async move {
                let _ = cache.run_fetch(&key, fetcher, done).await;
            });
        }
    }

    /// Invalidate every entry belonging to `command`.
    pub fn invalidate_command(&self, command: &str) {
        let keys: Vec<QueryKey> = {
            let entries = self.inner.entries.lock();
            entries
                .keys()
                .filter(|key| key.matches_command(command))
                .cloned()
                .collect()
        };

        for key in keys {
            self.invalidate(&key);
        }
    }

    /// Observe `key`. The subscription keeps the entry from being evicted
    /// on invalidation and yields update/invalidation events.
    pub fn subscribe(&self, key: &QueryKey) -> QuerySubscription {
        {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::idle);
            entry.subscribers += 1;
        }

        QuerySubscription {
            cache: self.clone(),
            key: key.clone(),
            rx: self.inner.events.subscribe(),
        }
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        let entries = self.inner.entries.lock();
        match entries.get(key) {
            None => QueryStatus::Idle,
            Some(entry) => match &entry.state {
                EntryState::Idle => QueryStatus::Idle,
                EntryState::Pending { .. } => QueryStatus::Pending,
                EntryState::Ready { result, .. } => {
                    if result.is_ok() {
                        QueryStatus::Success
                    } else {
                        QueryStatus::Error
                    }
                }
            },
        }
    }

    /// Non-fetching read of a completed entry.
    pub fn peek<T: Any + Send + Sync>(&self, key: &QueryKey) -> Option<Result<Arc<T>, QueryError>> {
        let entries = self.inner.entries.lock();
        let entry = entries.get(key)?;
        match &entry.state {
            EntryState::Ready { result, .. } => match result {
                Ok(value) => value.clone().downcast::<T>().ok().map(Ok),
                Err(err) => Some(Err(err.clone())),
            },
            _ => None,
        }
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        let entries = self.inner.entries.lock();
        entries.get(key).map(|entry| entry.stale).unwrap_or(false)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.inner.entries.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Age of the completed entry for `key`, if any.
    pub fn updated_at(&self, key: &QueryKey) -> Option<Instant> {
        let entries = self.inner.entries.lock();
        match &entries.get(key)?.state {
            EntryState::Ready { updated_at, .. } => Some(*updated_at),
            _ => None,
        }
    }

    async fn fetch_erased(&self, key: QueryKey, fetcher: Fetcher) -> FetchResult {
        let plan = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::idle);
            entry.fetcher = Some(fetcher.clone());

            match &entry.state {
                EntryState::Pending { done } => Plan::Wait(done.subscribe()),
                EntryState::Ready { result, .. } if !entry.stale => Plan::Hit(result.clone()),
                _ => {
                    let (done, _) = broadcast::channel(1);
                    entry.state = EntryState::Pending { done: done.clone() };
                    entry.stale = false;
                    Plan::Run(done)
                }
            }
        };

        match plan {
            Plan::Hit(result) => result,
            Plan::Wait(mut rx) => match rx.recv().await {
                Ok(result) => result,
                Err(_) => Err(QueryError::Transport("shared fetch was dropped".into())),
            },
            Plan::Run(done) => self.run_fetch(&key, fetcher, done).await,
        }
    }

    async fn run_fetch(
        &self,
        key: &QueryKey,
        fetcher: Fetcher,
        done: broadcast::Sender<FetchResult>,
    ) -> FetchResult {
        tracing::debug!(key = %key, "query fetch started");
        let result = (fetcher)().await;

        {
            let mut entries = self.inner.entries.lock();
            if let Some(entry) = entries.get_mut(key) {
                if matches!(&result, Err(err) if err.is_transport()) {
                    // Transport failures are raised, never cached as a value.
                    entry.state = EntryState::Idle;
                } else {
                    // An invalidation that landed mid-flight leaves the
                    // stale mark set; the result is stored but re-fetched
                    // on next access.
                    entry.state = EntryState::Ready {
                        result: result.clone(),
                        updated_at: Instant::now(),
                    };
                }
            }
            let _ = done.send(result.clone());
        }

        self.emit(key, QueryEventKind::Updated);
        result
    }

    fn emit(&self, key: &QueryKey, kind: QueryEventKind) {
        let _ = self.inner.events.send(QueryEvent {
            key: key.clone(),
            kind,
        });
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

fn erase_fetcher<T, F, Fut>(fetcher: F) -> Fetcher
where
    T: Any + Send + Sync,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
{
    Arc::new(move || {
        let fut = fetcher();
        Box::pin(async move { fut.await.map(|value| Arc::new(value) as SharedValue) })
    })
}

/// Observer registration for a key. Dropping it decrements the entry's
/// subscriber count; retention after the count reaches zero is the
/// session's policy, not the cache's.
pub struct QuerySubscription {
    cache: QueryCache,
    key: QueryKey,
    rx: broadcast::Receiver<QueryEvent>,
}

impl QuerySubscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Wait for the next event touching this subscription's key.
    pub async fn next_event(&mut self) -> Option<QueryEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.key == self.key => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        let mut entries = self.cache.inner.entries.lock();
        if let Some(entry) = entries.get_mut(&self.key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
        }
    }
}
