//! Request-scoped batch loader
//!
//! A [`BatchLoader`] collects the keys requested while a batch window is
//! open and resolves them with a single [`Loader::load`] call. Every key is
//! cached for the lifetime of the loader, so a key requested twice shares the
//! first request's result.
//!
//! A window opens with the first uncached key and closes once the configured
//! delay has elapsed or the batch reaches its size limit. Sibling resolvers
//! polled by the GraphQL executor in the same pass all land in the window.
//! The window is always timed and never shorter than [`MIN_BATCH_DELAY`],
//! since every waiter of a shared batch re-polls it.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};

/// Default time a batch window stays open
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(1);

/// Shortest window a loader accepts; shorter delays are raised to this
pub const MIN_BATCH_DELAY: Duration = Duration::from_millis(1);

/// Default number of keys after which a batch is dispatched early
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// Batched fetch of values by key
///
/// Implementations return the values that exist, keyed by their own key.
/// Order does not matter; keys absent from the map resolve to `None`, and
/// entries for keys that were not asked for are ignored.
pub trait Loader<K>: Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;
    type Error: Clone + Send + Sync + 'static;

    fn load(
        &self,
        keys: &[K],
    ) -> impl Future<Output = Result<HashMap<K, Self::Value>, Self::Error>> + Send;
}

/// Batch window and size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderSettings {
    /// How long a batch collects keys before dispatching
    pub delay: Duration,
    /// Dispatch a batch as soon as it holds this many keys
    pub max_batch_size: usize,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_BATCH_DELAY,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

type BatchOutput<K, V, E> = Result<Arc<HashMap<K, V>>, E>;
type BatchFuture<K, V, E> = Shared<BoxFuture<'static, BatchOutput<K, V, E>>>;

type LoaderFuture<K, L> =
    BatchFuture<K, <L as Loader<K>>::Value, <L as Loader<K>>::Error>;

struct OpenBatch<K, L: Loader<K>> {
    id: u64,
    future: LoaderFuture<K, L>,
}

struct State<K, L: Loader<K>> {
    next_batch: u64,
    open: Option<OpenBatch<K, L>>,
    /// Keys collected per batch, removed when the batch dispatches
    pending: HashMap<u64, Vec<K>>,
    /// Batch each requested key belongs to
    cache: HashMap<K, (u64, LoaderFuture<K, L>)>,
}

struct Inner<K, L: Loader<K>> {
    loader: L,
    settings: LoaderSettings,
    state: Mutex<State<K, L>>,
}

impl<K, L: Loader<K>> Inner<K, L> {
    fn state(&self) -> MutexGuard<'_, State<K, L>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Deduplicating, caching batch loader for one request
pub struct BatchLoader<K, L: Loader<K>> {
    inner: Arc<Inner<K, L>>,
}

impl<K, L: Loader<K>> Clone for BatchLoader<K, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, L> BatchLoader<K, L>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    L: Loader<K>,
{
    /// Create a loader with default settings
    pub fn new(loader: L) -> Self {
        Self::with_settings(loader, LoaderSettings::default())
    }

    /// Create a loader with explicit window settings
    pub fn with_settings(loader: L, settings: LoaderSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                loader,
                settings: LoaderSettings {
                    delay: settings.delay.max(MIN_BATCH_DELAY),
                    max_batch_size: settings.max_batch_size.max(1),
                },
                state: Mutex::new(State {
                    next_batch: 0,
                    open: None,
                    pending: HashMap::new(),
                    cache: HashMap::new(),
                }),
            }),
        }
    }

    /// The wrapped loader
    pub fn loader(&self) -> &L {
        &self.inner.loader
    }

    /// Load the value for `key`, or `None` if the loader has no value for it
    pub async fn load_one(&self, key: K) -> Result<Option<L::Value>, L::Error> {
        let batch = self.enqueue(key.clone());
        let values = batch.await?;
        Ok(values.get(&key).cloned())
    }

    /// Load the values for `keys`; keys without a value are left out
    pub async fn load_many<I>(&self, keys: I) -> Result<HashMap<K, L::Value>, L::Error>
    where
        I: IntoIterator<Item = K>,
    {
        let mut requested: Vec<K> = Vec::new();
        let mut batches: Vec<(u64, LoaderFuture<K, L>)> = Vec::new();
        {
            let mut state = self.inner.state();
            for key in keys {
                if requested.contains(&key) {
                    continue;
                }
                let (id, future) = self.enqueue_locked(&mut state, key.clone());
                if !batches.iter().any(|(seen, _)| *seen == id) {
                    batches.push((id, future));
                }
                requested.push(key);
            }
        }

        let results = join_all(batches.into_iter().map(|(_, future)| future)).await;
        let mut values = HashMap::with_capacity(requested.len());
        for result in results {
            let batch = result?;
            for key in &requested {
                if let Some(value) = batch.get(key) {
                    values.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(values)
    }

    /// Forget every cached key and close the open window.
    ///
    /// Batches already in flight still deliver to their callers. Keys
    /// requested afterwards go to a new batch.
    pub fn clear(&self) {
        let mut state = self.inner.state();
        state.cache.clear();
        state.open = None;
    }

    fn enqueue(&self, key: K) -> LoaderFuture<K, L> {
        let mut state = self.inner.state();
        self.enqueue_locked(&mut state, key).1
    }

    fn enqueue_locked(&self, state: &mut State<K, L>, key: K) -> (u64, LoaderFuture<K, L>) {
        if let Some((id, future)) = state.cache.get(&key) {
            return (*id, future.clone());
        }

        let max_batch_size = self.inner.settings.max_batch_size;
        let reusable = state.open.as_ref().and_then(|open| {
            let collected = state.pending.get(&open.id).map_or(0, Vec::len);
            (collected < max_batch_size).then(|| (open.id, open.future.clone()))
        });

        let (id, future) = match reusable {
            Some(batch) => batch,
            None => {
                let id = state.next_batch;
                state.next_batch += 1;
                let future = self.batch_future(id);
                state.open = Some(OpenBatch {
                    id,
                    future: future.clone(),
                });
                (id, future)
            }
        };

        state.pending.entry(id).or_default().push(key.clone());
        state.cache.insert(key, (id, future.clone()));
        (id, future)
    }

    fn batch_future(&self, id: u64) -> LoaderFuture<K, L> {
        // Weak: the cache owns this future until it completes
        let weak: Weak<Inner<K, L>> = Arc::downgrade(&self.inner);
        let delay = self.inner.settings.delay;
        async move {
            tokio::time::sleep(delay).await;

            let Some(inner) = weak.upgrade() else {
                return Ok(Arc::new(HashMap::new()));
            };

            let keys = {
                let mut state = inner.state();
                if state.open.as_ref().is_some_and(|open| open.id == id) {
                    state.open = None;
                }
                state.pending.remove(&id).unwrap_or_default()
            };

            if keys.is_empty() {
                return Ok(Arc::new(HashMap::new()));
            }

            tracing::debug!(
                batch = id,
                keys = keys.len(),
                loader = std::any::type_name::<L>(),
                "Dispatching batched load"
            );

            match inner.loader.load(&keys).await {
                Ok(values) => Ok(Arc::new(values)),
                Err(error) => {
                    // Failed keys may be requested again in a new batch
                    let mut state = inner.state();
                    for key in &keys {
                        if state.cache.get(key).is_some_and(|(batch, _)| *batch == id) {
                            state.cache.remove(key);
                        }
                    }
                    tracing::debug!(batch = id, keys = keys.len(), "Batched load failed");
                    Err(error)
                }
            }
        }
        .boxed()
        .shared()
    }
}
