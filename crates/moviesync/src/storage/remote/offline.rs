use std::marker::PhantomData;

use async_trait::async_trait;

use moviesync_core::datasource::{DataSource, ItemStream, QueryOptions, Result};
use moviesync_core::Entity;

use crate::stream::single;

/// Remote store for entity types that only live on the device.
///
/// Always reports an empty collection and accepts every write, so a
/// repository built on it behaves as cache plus local store.
pub struct OfflineRemote<E> {
    entity: PhantomData<fn() -> E>,
}

impl<E> Default for OfflineRemote<E> {
    fn default() -> Self {
        Self {
            entity: PhantomData,
        }
    }
}

impl<E> OfflineRemote<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<E: Entity> DataSource<E> for OfflineRemote<E> {
    fn get_items(&self) -> ItemStream<'_, Vec<E>> {
        single(async { Ok(Vec::new()) })
    }

    fn get_items_with(&self, _options: QueryOptions) -> ItemStream<'_, Vec<E>> {
        single(async { Ok(Vec::new()) })
    }

    fn get_item(&self, _id: &str) -> ItemStream<'_, Option<E>> {
        single(async { Ok(None) })
    }

    async fn add(&self, _item: &E) -> Result<()> {
        Ok(())
    }

    async fn add_all(&self, _items: &[E]) -> Result<()> {
        Ok(())
    }

    async fn update(&self, _item: &E) -> Result<()> {
        Ok(())
    }

    async fn remove(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    async fn remove_all(&self) -> Result<()> {
        Ok(())
    }

    fn invalidate(&self) {}
}
