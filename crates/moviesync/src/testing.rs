//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{RwLock, Semaphore};

use moviesync_core::datasource::{
    DataSource, DataSourceError, ItemStream, LocalStore, QueryOptions, Result,
};
use moviesync_core::Entity;

use crate::stream::single;

/// Store that counts every call, records write arguments and can be told
/// to fail, to delay reads, or to hold writes until permits are released.
pub struct MockStore<E: Entity> {
    items: RwLock<Vec<E>>,
    fail_reads: Option<DataSourceError>,
    fail_writes: Option<DataSourceError>,
    read_delay: Option<Duration>,
    gate: Option<Arc<Semaphore>>,

    pub get_items_calls: AtomicUsize,
    pub get_items_with_calls: AtomicUsize,
    pub get_item_calls: AtomicUsize,
    pub completed_reads: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub add_all_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
    pub remove_all_calls: AtomicUsize,
    pub invalidate_calls: AtomicUsize,

    pub added: RwLock<Vec<E>>,
    pub removed: RwLock<Vec<String>>,
    pub options: RwLock<Vec<QueryOptions>>,
}

impl<E: Entity> MockStore<E> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            items: RwLock::new(items),
            fail_reads: None,
            fail_writes: None,
            read_delay: None,
            gate: None,
            get_items_calls: AtomicUsize::new(0),
            get_items_with_calls: AtomicUsize::new(0),
            get_item_calls: AtomicUsize::new(0),
            completed_reads: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
            add_all_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
            remove_all_calls: AtomicUsize::new(0),
            invalidate_calls: AtomicUsize::new(0),
            added: RwLock::new(Vec::new()),
            removed: RwLock::new(Vec::new()),
            options: RwLock::new(Vec::new()),
        }
    }

    pub fn failing_reads(mut self, error: DataSourceError) -> Self {
        self.fail_reads = Some(error);
        self
    }

    pub fn failing_writes(mut self, error: DataSourceError) -> Self {
        self.fail_writes = Some(error);
        self
    }

    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Every write waits for one permit of `gate` before doing anything.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub async fn items(&self) -> Vec<E> {
        self.items.read().await.clone()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.items.read().await.iter().any(|item| item.id() == id)
    }

    async fn read<T>(&self, read: impl FnOnce(&[E]) -> T) -> Result<T> {
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        self.completed_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.fail_reads {
            return Err(error.clone());
        }
        Ok(read(&self.items.read().await))
    }

    async fn write(&self) -> Result<()> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        match &self.fail_writes {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn upsert(&self, item: &E) {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
    }
}

/// Reads the current value of a call counter.
pub fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

#[async_trait]
impl<E: Entity> DataSource<E> for MockStore<E> {
    fn get_items(&self) -> ItemStream<'_, Vec<E>> {
        self.get_items_calls.fetch_add(1, Ordering::SeqCst);
        single(self.read(|items| items.to_vec()))
    }

    fn get_items_with(&self, options: QueryOptions) -> ItemStream<'_, Vec<E>> {
        self.get_items_with_calls.fetch_add(1, Ordering::SeqCst);
        single(async move {
            self.options.write().await.push(options);
            self.read(|items| items.to_vec()).await
        })
    }

    fn get_item(&self, id: &str) -> ItemStream<'_, Option<E>> {
        self.get_item_calls.fetch_add(1, Ordering::SeqCst);
        let id = id.to_string();
        single(async move {
            self.read(|items| items.iter().find(|item| item.id() == id).cloned())
                .await
        })
    }

    async fn add(&self, item: &E) -> Result<()> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.added.write().await.push(item.clone());
        self.write().await?;
        self.upsert(item).await;
        Ok(())
    }

    async fn add_all(&self, items: &[E]) -> Result<()> {
        self.add_all_calls.fetch_add(1, Ordering::SeqCst);
        self.added.write().await.extend_from_slice(items);
        self.write().await?;
        for item in items {
            self.upsert(item).await;
        }
        Ok(())
    }

    async fn update(&self, item: &E) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.write().await?;
        if !self.contains(item.id()).await {
            return Err(DataSourceError::not_found(E::ENTITY_TYPE, item.id()));
        }
        self.upsert(item).await;
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.removed.write().await.push(id.to_string());
        self.write().await?;
        self.items.write().await.retain(|item| item.id() != id);
        Ok(())
    }

    async fn remove_all(&self) -> Result<()> {
        self.remove_all_calls.fetch_add(1, Ordering::SeqCst);
        self.write().await?;
        self.items.write().await.clear();
        Ok(())
    }

    fn invalidate(&self) {
        self.invalidate_calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl<E: Entity> LocalStore<E> for MockStore<E> {
    fn observe_items(&self) -> ItemStream<'_, Vec<E>> {
        single(self.read(|items| items.to_vec()))
    }
}
