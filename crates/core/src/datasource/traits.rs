use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_core::Stream;

use crate::entity::Entity;

use super::{QueryOptions, Result};

/// Asynchronous sequence of results produced by a read operation.
///
/// Dropping the stream cancels whatever work is still in flight.
pub type ItemStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Uniform read/write contract implemented by local, remote and composite stores.
#[async_trait]
pub trait DataSource<E: Entity>: Send + Sync {
    /// Emits the complete current collection.
    fn get_items(&self) -> ItemStream<'_, Vec<E>>;

    /// Emits the collection filtered/sorted by source-specific options.
    ///
    /// Fails with `UnsupportedQuery` when the options carry keys this
    /// source cannot honor.
    fn get_items_with(&self, options: QueryOptions) -> ItemStream<'_, Vec<E>>;

    /// Zero-or-one lookup. `None` is a valid terminal value, not an error.
    fn get_item(&self, id: &str) -> ItemStream<'_, Option<E>>;

    /// Upserts one item.
    async fn add(&self, item: &E) -> Result<()>;

    /// Upserts every item.
    async fn add_all(&self, items: &[E]) -> Result<()>;

    /// Replaces an existing item; fails with `NotFound` if this store lacks it.
    async fn update(&self, item: &E) -> Result<()>;

    /// Removes one item by id.
    async fn remove(&self, id: &str) -> Result<()>;

    /// Removes every item.
    async fn remove_all(&self) -> Result<()>;

    /// Marks cached or derived state stale. Performs no I/O.
    fn invalidate(&self);
}

/// Durable per-device store.
///
/// Point lookups never fail on a missing record; they yield `None`.
pub trait LocalStore<E: Entity>: DataSource<E> {
    /// Emits the current collection and re-emits after every committed change.
    ///
    /// The stream stays open until the subscriber drops it.
    fn observe_items(&self) -> ItemStream<'_, Vec<E>>;
}

#[async_trait]
impl<E, T> DataSource<E> for Arc<T>
where
    E: Entity,
    T: DataSource<E> + ?Sized,
{
    fn get_items(&self) -> ItemStream<'_, Vec<E>> {
        (**self).get_items()
    }

    fn get_items_with(&self, options: QueryOptions) -> ItemStream<'_, Vec<E>> {
        (**self).get_items_with(options)
    }

    fn get_item(&self, id: &str) -> ItemStream<'_, Option<E>> {
        (**self).get_item(id)
    }

    async fn add(&self, item: &E) -> Result<()> {
        (**self).add(item).await
    }

    async fn add_all(&self, items: &[E]) -> Result<()> {
        (**self).add_all(items).await
    }

    async fn update(&self, item: &E) -> Result<()> {
        (**self).update(item).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        (**self).remove(id).await
    }

    async fn remove_all(&self) -> Result<()> {
        (**self).remove_all().await
    }

    fn invalidate(&self) {
        (**self).invalidate()
    }
}
