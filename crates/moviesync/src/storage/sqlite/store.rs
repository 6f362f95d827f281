//! SQLite local store.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use rusqlite::types::Value;
use tokio::sync::watch;
use tokio_rusqlite::Connection;
use tokio_stream::wrappers::WatchStream;

use moviesync_core::datasource::{
    DataSource, DataSourceError, ItemStream, LocalStore, QueryOptions, Result, PAGE, PAGE_SIZE,
    SORT_BY,
};
use moviesync_core::Entity;

use super::conversions::RowMapping;
use super::error::map_tokio_rusqlite_error;
use super::schema;
use crate::stream::single;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Durable local store for one entity type, laid out by `M`.
///
/// Cloning shares the connection and the change channel.
pub struct SqliteStore<M: RowMapping> {
    conn: Connection,
    changes: Arc<watch::Sender<u64>>,
    mapping: PhantomData<fn() -> M>,
}

impl<M: RowMapping> Clone for SqliteStore<M> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            changes: Arc::clone(&self.changes),
            mapping: PhantomData,
        }
    }
}

impl<M: RowMapping> SqliteStore<M> {
    /// Creates a store with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| DataSourceError::Transport(e.to_string()))?;

        Self::with_connection(conn).await
    }

    /// Creates a store on an already open connection.
    ///
    /// Several stores may share one connection, one table each.
    pub async fn with_connection(conn: Connection) -> Result<Self> {
        let create = schema::create_table(M::TABLE, M::COLUMNS);
        conn.call(move |conn| conn.execute_batch(&create).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, M::Entity::ENTITY_TYPE, ""))?;

        tracing::debug!(table = M::TABLE, "SQLite store ready");

        let (changes, _) = watch::channel(0);
        Ok(Self {
            conn,
            changes: Arc::new(changes),
            mapping: PhantomData,
        })
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    async fn select(&self, options: QueryOptions) -> Result<Vec<M::Entity>> {
        options.ensure_supported(&[SORT_BY, PAGE])?;

        let order_by = match options.sort_order()? {
            None => None,
            Some(order) => Some(M::order_by(order).ok_or_else(|| {
                DataSourceError::UnsupportedQuery {
                    keys: vec![SORT_BY.to_string()],
                }
            })?),
        };
        let page = options.page_number()?;

        let sql = schema::select_all(M::TABLE, M::COLUMNS, order_by, page.is_some());
        let limits: Vec<i64> = match page {
            Some(page) => vec![PAGE_SIZE as i64, (page as i64 - 1) * PAGE_SIZE as i64],
            None => Vec::new(),
        };

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(limits), M::from_row)
                    .map_err(wrap_err)?;

                let mut items = Vec::new();
                for row_result in rows {
                    items.push(row_result.map_err(wrap_err)?);
                }
                Ok(items)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, M::Entity::ENTITY_TYPE, ""))
    }

    async fn select_one(&self, id: String) -> Result<Option<M::Entity>> {
        let sql = schema::select_by_id(M::TABLE, M::COLUMNS);
        let entity_id = id.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                match stmt.query_row([&id], M::from_row) {
                    Ok(item) => Ok(Some(item)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, M::Entity::ENTITY_TYPE, entity_id))
    }

    async fn upsert(&self, rows: Vec<Vec<Value>>, id: String) -> Result<()> {
        let sql = schema::upsert(M::TABLE, M::COLUMNS);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                {
                    let mut stmt = tx.prepare(&sql).map_err(wrap_err)?;
                    for values in rows {
                        stmt.execute(rusqlite::params_from_iter(values))
                            .map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, M::Entity::ENTITY_TYPE, id))?;

        self.notify();
        Ok(())
    }
}

#[async_trait]
impl<M: RowMapping> DataSource<M::Entity> for SqliteStore<M> {
    fn get_items(&self) -> ItemStream<'_, Vec<M::Entity>> {
        single(self.select(QueryOptions::new()))
    }

    fn get_items_with(&self, options: QueryOptions) -> ItemStream<'_, Vec<M::Entity>> {
        single(self.select(options))
    }

    fn get_item(&self, id: &str) -> ItemStream<'_, Option<M::Entity>> {
        single(self.select_one(id.to_string()))
    }

    async fn add(&self, item: &M::Entity) -> Result<()> {
        self.upsert(vec![M::to_values(item)], item.id().to_string())
            .await
    }

    async fn add_all(&self, items: &[M::Entity]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let rows = items.iter().map(M::to_values).collect();
        self.upsert(rows, String::new()).await?;
        tracing::debug!(table = M::TABLE, count = items.len(), "Upserted rows");
        Ok(())
    }

    async fn update(&self, item: &M::Entity) -> Result<()> {
        let sql = schema::update_by_id(M::TABLE, M::COLUMNS);
        let values = M::to_values(item);
        let id = item.id().to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(&sql, rusqlite::params_from_iter(values))
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, M::Entity::ENTITY_TYPE, id))?;

        self.notify();
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let sql = schema::delete_by_id(M::TABLE);
        let row_id = id.to_string();

        let removed = self
            .conn
            .call(move |conn| conn.execute(&sql, [&row_id]).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, M::Entity::ENTITY_TYPE, id))?;

        if removed > 0 {
            self.notify();
        }
        Ok(())
    }

    async fn remove_all(&self) -> Result<()> {
        let sql = schema::delete_all(M::TABLE);

        let removed = self
            .conn
            .call(move |conn| conn.execute(&sql, []).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, M::Entity::ENTITY_TYPE, ""))?;

        tracing::debug!(table = M::TABLE, removed, "Cleared table");
        self.notify();
        Ok(())
    }

    fn invalidate(&self) {
        tracing::trace!(table = M::TABLE, "SQLite store reads are always fresh");
    }
}

impl<M: RowMapping> LocalStore<M::Entity> for SqliteStore<M> {
    fn observe_items(&self) -> ItemStream<'_, Vec<M::Entity>> {
        let changes = WatchStream::new(self.changes.subscribe());
        Box::pin(changes.then(move |_| self.select(QueryOptions::new())))
    }
}
