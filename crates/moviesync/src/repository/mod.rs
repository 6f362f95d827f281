//! Composite data source over an in-memory cache, a local store and a
//! remote store.
//!
//! Reads consult the cache, then the local store, then the remote store, and
//! write remote results back into the local store and the cache. Writes go
//! to the cache first and then fan out to both stores concurrently.

mod dirty;
mod policy;
mod write;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use moviesync_core::datasource::{
    DataSource, DataSourceError, ItemStream, LocalStore, QueryOptions, Result,
};
use moviesync_core::Entity;

use crate::cache::EntityCache;
use crate::stream::{first_emission, single};

use dirty::DirtyFlag;

pub use policy::WritePolicy;

use write::{Outcome, Undo};

/// Remote fetch running on its own task. Dropping the handle aborts it.
struct RemoteFetch<T>(JoinHandle<Result<Option<T>>>);

impl<T> RemoteFetch<T> {
    async fn join(mut self) -> Result<Option<T>> {
        match (&mut self.0).await {
            Ok(result) => result,
            Err(err) => Err(DataSourceError::Transport(format!(
                "Remote fetch task failed: {err}"
            ))),
        }
    }
}

impl<T> Drop for RemoteFetch<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Repository for one entity type.
///
/// Cloning is cheap and shares the cache, the dirty flag and both stores.
///
/// # Type Parameters
///
/// * `E` - The entity type
/// * `L` - The local store
/// * `R` - The remote store
pub struct Repository<E, L: ?Sized, R: ?Sized>
where
    E: Entity,
{
    local: Arc<L>,
    remote: Arc<R>,
    cache: Arc<EntityCache<E>>,
    dirty: Arc<DirtyFlag>,
    policy: WritePolicy,
}

impl<E: Entity, L: ?Sized, R: ?Sized> Clone for Repository<E, L, R> {
    fn clone(&self) -> Self {
        Self {
            local: Arc::clone(&self.local),
            remote: Arc::clone(&self.remote),
            cache: Arc::clone(&self.cache),
            dirty: Arc::clone(&self.dirty),
            policy: self.policy,
        }
    }
}

impl<E, L, R> Repository<E, L, R>
where
    E: Entity,
    L: LocalStore<E> + ?Sized + 'static,
    R: DataSource<E> + ?Sized + 'static,
{
    /// Creates a repository with an empty cache and a clean dirty flag.
    pub fn new(local: Arc<L>, remote: Arc<R>) -> Self {
        Self {
            local,
            remote,
            cache: Arc::new(EntityCache::new()),
            dirty: Arc::new(DirtyFlag::default()),
            policy: WritePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    /// The repository's cache. Read-only access for inspection.
    pub fn cache(&self) -> &EntityCache<E> {
        &self.cache
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set()
    }

    /// Alias of [`DataSource::invalidate`]: the next `get_items` goes to
    /// the remote store.
    pub fn refresh(&self) {
        self.invalidate();
    }

    /// Follows the local store's observable query, folding every emission
    /// into the cache.
    pub fn observe_items(&self) -> ItemStream<'_, Vec<E>> {
        Box::pin(async_stream::stream! {
            let mut local = self.local.observe_items();
            while let Some(batch) = local.next().await {
                if let Ok(items) = &batch {
                    self.cache.fold_all(items).await;
                }
                yield batch;
            }
        })
    }

    async fn fetch_items(&self) -> Result<Vec<E>> {
        if self.is_dirty() {
            tracing::debug!(entity_type = E::ENTITY_TYPE, "Cache dirty, fetching from remote only");
            let token = self.dirty.begin();
            let items = first_emission(self.remote.get_items())
                .await?
                .unwrap_or_default();
            self.absorb_remote(&items).await;
            self.dirty.clear(token);
            return Ok(items);
        }

        let cached = self.cache.snapshot().await;
        if !cached.is_empty() {
            tracing::trace!(
                entity_type = E::ENTITY_TYPE,
                count = cached.len(),
                "Cache hit for items"
            );
            return Ok(cached);
        }

        tracing::trace!(entity_type = E::ENTITY_TYPE, "Cache miss for items");
        self.merge(None).await
    }

    /// Queries both stores concurrently and returns the first non-empty
    /// list, local before remote.
    async fn merge(&self, options: Option<QueryOptions>) -> Result<Vec<E>> {
        let unfiltered = options.is_none();
        let token = self.dirty.begin();

        let remote = Arc::clone(&self.remote);
        let remote_options = options.clone();
        let remote_fetch = RemoteFetch(tokio::spawn(async move {
            let stream = match remote_options {
                Some(options) => remote.get_items_with(options),
                None => remote.get_items(),
            };
            first_emission(stream).await
        }));

        let mut local = match options {
            Some(options) => self.local.get_items_with(options),
            None => self.local.get_items(),
        };
        while let Some(batch) = local.next().await {
            let items = batch?;
            if items.is_empty() {
                continue;
            }
            self.cache.fold_all(&items).await;
            tracing::trace!(
                entity_type = E::ENTITY_TYPE,
                count = items.len(),
                "Served items from local store"
            );
            return Ok(items);
        }
        drop(local);

        let items = remote_fetch.join().await?.unwrap_or_default();
        if items.is_empty() {
            return Err(DataSourceError::NoData {
                entity_type: E::ENTITY_TYPE,
            });
        }

        self.absorb_remote(&items).await;
        if unfiltered {
            self.dirty.clear(token);
        }
        tracing::debug!(
            entity_type = E::ENTITY_TYPE,
            count = items.len(),
            "Served items from remote store"
        );
        Ok(items)
    }

    /// Persists remote items into the local store one by one, then folds
    /// them into the cache.
    async fn absorb_remote(&self, items: &[E]) {
        for item in items {
            if let Err(err) = self.local.add(item).await {
                tracing::warn!(
                    entity_type = E::ENTITY_TYPE,
                    id = item.id(),
                    error = %err,
                    "Failed to persist remote item locally"
                );
            }
        }
        self.cache.fold_all(items).await;
    }

    async fn fetch_item(&self, id: String) -> Result<Option<E>> {
        if let Some(hit) = self.cache.get(&id).await {
            tracing::trace!(entity_type = E::ENTITY_TYPE, %id, "Cache hit for item");
            return Ok(Some(hit));
        }

        if let Some(found) = first_emission(self.local.get_item(&id)).await?.flatten() {
            tracing::trace!(entity_type = E::ENTITY_TYPE, %id, "Item found in local store");
            self.cache.fold(&found).await;
            return Ok(Some(found));
        }

        match first_emission(self.remote.get_item(&id)).await?.flatten() {
            Some(found) => {
                tracing::debug!(entity_type = E::ENTITY_TYPE, %id, "Item found in remote store");
                self.absorb_remote(std::slice::from_ref(&found)).await;
                Ok(Some(found))
            }
            None => {
                tracing::trace!(entity_type = E::ENTITY_TYPE, %id, "Item absent everywhere");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<E, L, R> DataSource<E> for Repository<E, L, R>
where
    E: Entity,
    L: LocalStore<E> + ?Sized + 'static,
    R: DataSource<E> + ?Sized + 'static,
{
    fn get_items(&self) -> ItemStream<'_, Vec<E>> {
        single(self.fetch_items())
    }

    /// Options are not addressable in the cache, so this always queries
    /// both stores. The dirty flag is neither consulted nor cleared.
    fn get_items_with(&self, options: QueryOptions) -> ItemStream<'_, Vec<E>> {
        single(self.merge(Some(options)))
    }

    fn get_item(&self, id: &str) -> ItemStream<'_, Option<E>> {
        single(self.fetch_item(id.to_string()))
    }

    async fn add(&self, item: &E) -> Result<()> {
        let cached = self.cache.fold(item).await;
        let stored = self.prior_value(item.id(), &cached).await;

        let (local, remote) = tokio::join!(self.local.add(item), self.remote.add(item));

        let undo = vec![Undo {
            id: item.id().to_string(),
            cached,
            stored,
        }];
        self.settle("add", Outcome::of(local, remote), undo).await
    }

    async fn add_all(&self, items: &[E]) -> Result<()> {
        let previous = self.cache.fold_all(items).await;
        let mut seen = HashSet::with_capacity(items.len());
        let mut undo = Vec::with_capacity(items.len());
        for (item, cached) in items.iter().zip(previous) {
            // A repeated id saw the batch's own earlier value
            if !seen.insert(item.id()) {
                continue;
            }
            let stored = self.prior_value(item.id(), &cached).await;
            undo.push(Undo {
                id: item.id().to_string(),
                cached,
                stored,
            });
        }

        let (local, remote) = tokio::join!(self.local.add_all(items), self.remote.add_all(items));

        self.settle("add_all", Outcome::of(local, remote), undo).await
    }

    async fn update(&self, item: &E) -> Result<()> {
        let cached = self.cache.fold(item).await;
        let stored = self.prior_value(item.id(), &cached).await;

        let (local, remote) = tokio::join!(self.local.update(item), self.remote.update(item));

        let undo = vec![Undo {
            id: item.id().to_string(),
            cached,
            stored,
        }];
        self.settle("update", Outcome::of(local, remote), undo).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let cached = self.cache.evict(id).await;
        let stored = self.prior_value(id, &cached).await;

        let (local, remote) = tokio::join!(self.local.remove(id), self.remote.remove(id));

        let undo = vec![Undo {
            id: id.to_string(),
            cached,
            stored,
        }];
        self.settle("remove", Outcome::of(local, remote), undo).await
    }

    async fn remove_all(&self) -> Result<()> {
        let cleared = self.cache.clear().await;

        let mut stored = Vec::new();
        if self.policy == WritePolicy::Compensate {
            match first_emission(self.local.get_items()).await {
                Ok(items) => stored = items.unwrap_or_default(),
                Err(err) => tracing::warn!(
                    entity_type = E::ENTITY_TYPE,
                    error = %err,
                    "Could not snapshot local store before clearing"
                ),
            }
        }

        let (local, remote) = tokio::join!(self.local.remove_all(), self.remote.remove_all());

        let mut undo: Vec<Undo<E>> = cleared
            .into_iter()
            .map(|item| Undo {
                id: item.id().to_string(),
                stored: stored.iter().find(|s| s.id() == item.id()).cloned(),
                cached: Some(item),
            })
            .collect();
        for item in stored {
            if !undo.iter().any(|u| u.id == item.id()) {
                undo.push(Undo {
                    id: item.id().to_string(),
                    cached: None,
                    stored: Some(item),
                });
            }
        }

        self.settle("remove_all", Outcome::of(local, remote), undo).await
    }

    fn invalidate(&self) {
        tracing::debug!(entity_type = E::ENTITY_TYPE, "Repository invalidated");
        self.dirty.mark();
    }
}
