use std::sync::Arc;

use async_trait::async_trait;

use moviesync_client::{CatalogClient, ClientError, DiscoverQuery};
use moviesync_core::datasource::{
    DataSource, DataSourceError, ItemStream, QueryOptions, Result, PAGE, SORT_BY,
};
use moviesync_core::movie::{movie_from_dto, movies_from_page, Movie, MovieDto, Page};

use crate::stream::single;

/// The slice of the catalog API the remote store needs.
#[async_trait]
pub trait CatalogApi: Send + Sync + 'static {
    async fn discover(&self, query: &DiscoverQuery) -> moviesync_client::Result<Page<MovieDto>>;

    async fn movie(&self, id: u64) -> moviesync_client::Result<Option<MovieDto>>;
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn discover(&self, query: &DiscoverQuery) -> moviesync_client::Result<Page<MovieDto>> {
        self.discover_movies(query).await
    }

    async fn movie(&self, id: u64) -> moviesync_client::Result<Option<MovieDto>> {
        self.get_movie(id).await
    }
}

fn transport(err: ClientError) -> DataSourceError {
    DataSourceError::Transport(err.to_string())
}

/// Remote store over the catalog API.
///
/// One network round trip per read, no retries. Failures surface as
/// `Transport` errors.
pub struct CatalogRemoteStore<C: CatalogApi> {
    api: Arc<C>,
}

impl<C: CatalogApi> Clone for CatalogRemoteStore<C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<C: CatalogApi> CatalogRemoteStore<C> {
    pub fn new(api: Arc<C>) -> Self {
        Self { api }
    }

    async fn discover(&self, options: QueryOptions) -> Result<Vec<Movie>> {
        options.ensure_supported(&[SORT_BY, PAGE])?;

        let query = DiscoverQuery {
            sort_by: options.sort_order()?.map(|order| order.as_str().to_string()),
            page: options.page_number()?,
        };

        let page = self.api.discover(&query).await.map_err(transport)?;
        tracing::debug!(
            page = page.page,
            total_pages = page.total_pages,
            count = page.results.len(),
            "Fetched catalog page"
        );
        Ok(movies_from_page(page))
    }

    async fn lookup(&self, id: String) -> Result<Option<Movie>> {
        // Client-generated ids never exist upstream
        let Ok(catalog_id) = id.parse::<u64>() else {
            tracing::trace!(movie_id = %id, "Id is not a catalog id");
            return Ok(None);
        };

        let dto = self.api.movie(catalog_id).await.map_err(transport)?;
        Ok(dto.map(movie_from_dto))
    }
}

#[async_trait]
impl<C: CatalogApi> DataSource<Movie> for CatalogRemoteStore<C> {
    fn get_items(&self) -> ItemStream<'_, Vec<Movie>> {
        single(self.discover(QueryOptions::new()))
    }

    fn get_items_with(&self, options: QueryOptions) -> ItemStream<'_, Vec<Movie>> {
        single(self.discover(options))
    }

    fn get_item(&self, id: &str) -> ItemStream<'_, Option<Movie>> {
        single(self.lookup(id.to_string()))
    }

    async fn add(&self, _item: &Movie) -> Result<()> {
        Ok(())
    }

    async fn add_all(&self, _items: &[Movie]) -> Result<()> {
        Ok(())
    }

    async fn update(&self, _item: &Movie) -> Result<()> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::RwLock;

    use crate::stream::first_emission;

    /// Fake catalog that records queries and serves canned responses.
    #[derive(Default)]
    struct FakeCatalog {
        movies: Vec<MovieDto>,
        fail: bool,
        discover_calls: AtomicUsize,
        movie_calls: AtomicUsize,
        queries: RwLock<Vec<DiscoverQuery>>,
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn discover(
            &self,
            query: &DiscoverQuery,
        ) -> moviesync_client::Result<Page<MovieDto>> {
            self.discover_calls.fetch_add(1, Ordering::SeqCst);
            self.queries.write().await.push(query.clone());
            if self.fail {
                return Err(ClientError::ServerError {
                    status: 503,
                    message: "maintenance".to_string(),
                });
            }
            Ok(Page {
                page: query.page.unwrap_or(1),
                results: self.movies.clone(),
                total_results: self.movies.len() as u32,
                total_pages: 1,
            })
        }

        async fn movie(&self, id: u64) -> moviesync_client::Result<Option<MovieDto>> {
            self.movie_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.movies.iter().find(|m| m.id == id).cloned())
        }
    }

    fn dto(id: u64, title: &str) -> MovieDto {
        serde_json::from_value(serde_json::json!({ "id": id, "title": title })).unwrap()
    }

    fn store(catalog: FakeCatalog) -> (CatalogRemoteStore<FakeCatalog>, Arc<FakeCatalog>) {
        let api = Arc::new(catalog);
        (CatalogRemoteStore::new(Arc::clone(&api)), api)
    }

    #[tokio::test]
    async fn test_get_items_converts_ids_to_strings() {
        let (store, api) = store(FakeCatalog {
            movies: vec![dto(550, "Fight Club"), dto(949, "Heat")],
            ..Default::default()
        });

        let movies = first_emission(store.get_items()).await.unwrap().unwrap();

        let ids: Vec<_> = movies.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["550", "949"]);
        assert_eq!(api.discover_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_options_become_discover_query() {
        let (store, api) = store(FakeCatalog::default());
        let options = QueryOptions::new()
            .sort_by(moviesync_core::datasource::SortOrder::Rating)
            .page(3);

        first_emission(store.get_items_with(options)).await.unwrap();

        let queries = api.queries.read().await;
        assert_eq!(
            queries[0],
            DiscoverQuery {
                sort_by: Some("vote_average.desc".to_string()),
                page: Some(3),
            }
        );
    }

    #[tokio::test]
    async fn test_unsupported_option_skips_network() {
        let (store, api) = store(FakeCatalog::default());
        let options = QueryOptions::new().with("with_genres", "27");

        let result = first_emission(store.get_items_with(options)).await;

        assert!(matches!(
            result,
            Err(DataSourceError::UnsupportedQuery { .. })
        ));
        assert_eq!(api.discover_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_client_failure_is_transport_error() {
        let (store, _) = store(FakeCatalog {
            fail: true,
            ..Default::default()
        });

        let result = first_emission(store.get_items()).await;

        assert_eq!(
            result,
            Err(DataSourceError::Transport(
                "Catalog returned 503: maintenance".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_get_item_hit_and_miss() {
        let (store, api) = store(FakeCatalog {
            movies: vec![dto(550, "Fight Club")],
            ..Default::default()
        });

        let hit = first_emission(store.get_item("550")).await.unwrap().flatten();
        let miss = first_emission(store.get_item("551")).await.unwrap().flatten();

        assert_eq!(hit.map(|m| m.title), Some("Fight Club".to_string()));
        assert!(miss.is_none());
        assert_eq!(api.movie_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_absent_without_network() {
        let (store, api) = store(FakeCatalog::default());

        let found = first_emission(store.get_item("not-a-number")).await.unwrap();

        assert_eq!(found, Some(None));
        assert_eq!(api.movie_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_writes_are_noops() {
        let (store, api) = store(FakeCatalog::default());
        let movie = Movie::new("Local only");

        store.add(&movie).await.unwrap();
        store.update(&movie).await.unwrap();
        store.remove(&movie.id).await.unwrap();
        store.remove_all().await.unwrap();

        assert_eq!(api.discover_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.movie_calls.load(Ordering::SeqCst), 0);
    }
}
