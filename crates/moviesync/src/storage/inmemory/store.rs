use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::{watch, RwLock};
use tokio_stream::wrappers::WatchStream;

use moviesync_core::datasource::{
    DataSource, DataSourceError, ItemStream, LocalStore, QueryOptions, Result, SortOrder, PAGE,
    PAGE_SIZE, SORT_BY,
};
use moviesync_core::Entity;

use crate::stream::single;

/// Comparator used to honor the `sort_by` option.
pub type Sorter<E> = fn(SortOrder, &E, &E) -> Ordering;

/// Local store kept in process memory.
pub struct InMemoryStore<E: Entity> {
    items: Arc<RwLock<BTreeMap<String, E>>>,
    changes: Arc<watch::Sender<u64>>,
    sorter: Option<Sorter<E>>,
}

impl<E: Entity> Clone for InMemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            changes: Arc::clone(&self.changes),
            sorter: self.sorter,
        }
    }
}

impl<E: Entity> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryStore<E> {
    /// Creates an empty store that only understands the `page` option.
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    /// Enables the `sort_by` option using `sorter`.
    pub fn with_sorter(mut self, sorter: Sorter<E>) -> Self {
        self.sorter = Some(sorter);
        self
    }

    /// Creates a store pre-populated with `items`.
    pub fn from_items(items: impl IntoIterator<Item = E>) -> Self {
        let map: BTreeMap<String, E> = items
            .into_iter()
            .map(|item| (item.id().to_string(), item))
            .collect();
        let (changes, _) = watch::channel(0);
        Self {
            items: Arc::new(RwLock::new(map)),
            changes: Arc::new(changes),
            sorter: None,
        }
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    async fn snapshot(&self) -> Vec<E> {
        self.items.read().await.values().cloned().collect()
    }

    async fn query(&self, options: QueryOptions) -> Result<Vec<E>> {
        let supported: &[&str] = if self.sorter.is_some() {
            &[SORT_BY, PAGE]
        } else {
            &[PAGE]
        };
        options.ensure_supported(supported)?;

        let mut items = self.snapshot().await;

        if let (Some(order), Some(sorter)) = (options.sort_order()?, self.sorter) {
            items.sort_by(|a, b| sorter(order, a, b));
        }

        if let Some(page) = options.page_number()? {
            let skip = (page as usize - 1) * PAGE_SIZE;
            items = items.into_iter().skip(skip).take(PAGE_SIZE).collect();
        }

        Ok(items)
    }
}

#[async_trait]
impl<E: Entity> DataSource<E> for InMemoryStore<E> {
    fn get_items(&self) -> ItemStream<'_, Vec<E>> {
        single(async move { Ok(self.snapshot().await) })
    }

    fn get_items_with(&self, options: QueryOptions) -> ItemStream<'_, Vec<E>> {
        single(self.query(options))
    }

    fn get_item(&self, id: &str) -> ItemStream<'_, Option<E>> {
        let id = id.to_string();
        single(async move { Ok(self.items.read().await.get(&id).cloned()) })
    }

    async fn add(&self, item: &E) -> Result<()> {
        self.items
            .write()
            .await
            .insert(item.id().to_string(), item.clone());
        self.notify();
        Ok(())
    }

    async fn add_all(&self, items: &[E]) -> Result<()> {
        {
            let mut map = self.items.write().await;
            for item in items {
                map.insert(item.id().to_string(), item.clone());
            }
        }
        self.notify();
        Ok(())
    }

    async fn update(&self, item: &E) -> Result<()> {
        {
            let mut map = self.items.write().await;
            let Some(existing) = map.get_mut(item.id()) else {
                return Err(DataSourceError::not_found(E::ENTITY_TYPE, item.id()));
            };
            *existing = item.clone();
        }
        self.notify();
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let removed = self.items.write().await.remove(id).is_some();
        if removed {
            self.notify();
        }
        Ok(())
    }

    async fn remove_all(&self) -> Result<()> {
        self.items.write().await.clear();
        self.notify();
        Ok(())
    }

    fn invalidate(&self) {
        tracing::trace!(entity_type = E::ENTITY_TYPE, "In-memory store has nothing to invalidate");
    }
}

impl<E: Entity> LocalStore<E> for InMemoryStore<E> {
    fn observe_items(&self) -> ItemStream<'_, Vec<E>> {
        let items = Arc::clone(&self.items);
        let changes = WatchStream::new(self.changes.subscribe());

        Box::pin(changes.then(move |_| {
            let items = Arc::clone(&items);
            async move { Ok(items.read().await.values().cloned().collect()) }
        }))
    }
}
