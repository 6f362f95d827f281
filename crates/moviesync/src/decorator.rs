//! Read-path decorator for any `DataSource`.
//!
//! Wraps an existing data source and intercepts `get_items` only. Every other
//! operation is forwarded to the wrapped source unchanged.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;

use moviesync_core::datasource::{DataSource, ItemStream, QueryOptions, Result};
use moviesync_core::Entity;

use crate::stream::first_emission;

/// Decorator that can answer `get_items` with a direct service call.
///
/// - **Dirty**: skip the wrapped source and call the service with the
///   configured parameters. A successful call clears the flag.
/// - **Clean**: forward the wrapped source's stream; if it ends without
///   emitting (or reports `NoData`), call the service instead.
///
/// # Type Parameters
///
/// * `E` - The entity type
/// * `D` - The wrapped data source
/// * `S` - The service queried directly
pub struct ServiceDecorator<E, D, S: ?Sized> {
    inner: D,
    service: Arc<S>,
    params: QueryOptions,
    dirty: AtomicBool,
    entity: PhantomData<fn() -> E>,
}

impl<E, D, S> ServiceDecorator<E, D, S>
where
    E: Entity,
    D: DataSource<E>,
    S: DataSource<E> + ?Sized,
{
    /// Creates a clean decorator.
    ///
    /// # Arguments
    ///
    /// * `inner` - The data source to decorate
    /// * `service` - The source queried directly on bypass or fallback
    /// * `params` - Options passed to every direct service call
    pub fn new(inner: D, service: Arc<S>, params: QueryOptions) -> Self {
        Self {
            inner,
            service,
            params,
            dirty: AtomicBool::new(false),
            entity: PhantomData,
        }
    }

    /// Makes the next `get_items` bypass the wrapped source.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    async fn call_service(&self) -> Result<Vec<E>> {
        tracing::debug!(
            entity_type = E::ENTITY_TYPE,
            params = ?self.params,
            "Calling service directly"
        );
        let items = first_emission(self.service.get_items_with(self.params.clone()))
            .await?
            .unwrap_or_default();
        Ok(items)
    }
}

#[async_trait]
impl<E, D, S> DataSource<E> for ServiceDecorator<E, D, S>
where
    E: Entity,
    D: DataSource<E>,
    S: DataSource<E> + ?Sized,
{
    fn get_items(&self) -> ItemStream<'_, Vec<E>> {
        Box::pin(async_stream::stream! {
            if self.is_dirty() {
                let result = self.call_service().await;
                if result.is_ok() {
                    self.dirty.store(false, Ordering::SeqCst);
                }
                yield result;
            } else {
                let mut emitted = false;
                let mut inner = self.inner.get_items();
                while let Some(batch) = inner.next().await {
                    match batch {
                        Err(err) if err.is_no_data() => {
                            tracing::trace!(
                                entity_type = E::ENTITY_TYPE,
                                "Wrapped source has no data, falling back to service"
                            );
                            break;
                        }
                        batch => {
                            emitted = true;
                            yield batch;
                        }
                    }
                }

                if !emitted {
                    yield self.call_service().await;
                }
            }
        })
    }

    fn get_items_with(&self, options: QueryOptions) -> ItemStream<'_, Vec<E>> {
        self.inner.get_items_with(options)
    }

    fn get_item(&self, id: &str) -> ItemStream<'_, Option<E>> {
        self.inner.get_item(id)
    }

    async fn add(&self, item: &E) -> Result<()> {
        self.inner.add(item).await
    }

    async fn add_all(&self, items: &[E]) -> Result<()> {
        self.inner.add_all(items).await
    }

    async fn update(&self, item: &E) -> Result<()> {
        self.inner.update(item).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.inner.remove(id).await
    }

    async fn remove_all(&self) -> Result<()> {
        self.inner.remove_all().await
    }

    fn invalidate(&self) {
        self.inner.invalidate();
    }
}
