//! Write fan-out outcome handling.

use moviesync_core::datasource::{DataSource, DataSourceError, LocalStore, Result, StoreKind};
use moviesync_core::Entity;

use super::{Repository, WritePolicy};
use crate::cache::EntityCache;

/// Pre-write state of one id, used to undo a write.
pub(super) struct Undo<E> {
    pub id: String,
    /// What the cache held before the write.
    pub cached: Option<E>,
    /// What the stores held before the write, as far as the local store knows.
    pub stored: Option<E>,
}

/// Combined result of writing to both stores.
pub(super) enum Outcome {
    Done,
    Partial {
        succeeded: StoreKind,
        failed: StoreKind,
        error: DataSourceError,
    },
    Failed(DataSourceError),
}

impl Outcome {
    pub fn of(local: Result<()>, remote: Result<()>) -> Self {
        match (local, remote) {
            (Ok(()), Ok(())) => Outcome::Done,
            (Ok(()), Err(error)) => Outcome::Partial {
                succeeded: StoreKind::Local,
                failed: StoreKind::Remote,
                error,
            },
            (Err(error), Ok(())) => Outcome::Partial {
                succeeded: StoreKind::Remote,
                failed: StoreKind::Local,
                error,
            },
            (Err(local), Err(remote)) => {
                tracing::warn!(error = %remote, "Remote write failed alongside local write");
                Outcome::Failed(local)
            }
        }
    }
}

async fn undo_cache<E: Entity>(cache: &EntityCache<E>, undo: &[Undo<E>]) {
    for entry in undo {
        match &entry.cached {
            Some(previous) => {
                cache.fold(previous).await;
            }
            None => {
                cache.evict(&entry.id).await;
            }
        }
    }
}

async fn undo_store<E, S>(store: &S, undo: &[Undo<E>]) -> Result<()>
where
    E: Entity,
    S: DataSource<E> + ?Sized,
{
    for entry in undo {
        match &entry.stored {
            Some(previous) => store.add(previous).await?,
            None => store.remove(&entry.id).await?,
        }
    }
    Ok(())
}

impl<E, L, R> Repository<E, L, R>
where
    E: Entity,
    L: LocalStore<E> + ?Sized + 'static,
    R: DataSource<E> + ?Sized + 'static,
{
    /// Looks up what the stores hold for `id` before a write.
    ///
    /// Only the compensating policy needs this, so best-effort writes skip
    /// the extra read and trust the cache.
    pub(super) async fn prior_value(&self, id: &str, cached: &Option<E>) -> Option<E> {
        if self.policy == WritePolicy::BestEffort || cached.is_some() {
            return cached.clone();
        }

        match crate::stream::first_emission(self.local.get_item(id)).await {
            Ok(found) => found.flatten(),
            Err(err) => {
                tracing::warn!(
                    entity_type = E::ENTITY_TYPE,
                    id,
                    error = %err,
                    "Could not read pre-write value, compensation will remove instead"
                );
                None
            }
        }
    }

    /// Turns the outcome of a fan-out into the operation's result, undoing
    /// the write first when the policy asks for it.
    pub(super) async fn settle(
        &self,
        operation: &'static str,
        outcome: Outcome,
        undo: Vec<Undo<E>>,
    ) -> Result<()> {
        match outcome {
            Outcome::Done => {
                tracing::debug!(
                    entity_type = E::ENTITY_TYPE,
                    operation,
                    count = undo.len(),
                    "Write completed on both stores"
                );
                Ok(())
            }
            Outcome::Partial {
                succeeded,
                failed,
                error,
            } => {
                tracing::warn!(
                    entity_type = E::ENTITY_TYPE,
                    operation,
                    %succeeded,
                    %failed,
                    error = %error,
                    "Partial write failure"
                );

                if self.policy == WritePolicy::Compensate {
                    undo_cache(&self.cache, &undo).await;
                    let restored = match succeeded {
                        StoreKind::Local => undo_store(self.local.as_ref(), &undo).await,
                        StoreKind::Remote => undo_store(self.remote.as_ref(), &undo).await,
                    };
                    if let Err(err) = restored {
                        tracing::warn!(
                            entity_type = E::ENTITY_TYPE,
                            operation,
                            store = %succeeded,
                            error = %err,
                            "Compensation failed, stores may disagree"
                        );
                    }
                }

                Err(DataSourceError::PartialWriteFailure {
                    succeeded,
                    failed,
                    source: Box::new(error),
                })
            }
            Outcome::Failed(error) => {
                if self.policy == WritePolicy::Compensate {
                    undo_cache(&self.cache, &undo).await;
                }
                Err(error)
            }
        }
    }
}
