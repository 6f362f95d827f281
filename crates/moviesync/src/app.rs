//! Application wiring: one repository per entity type plus the catalog
//! client, and the read and write flows the CLI runs on top of them.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use moviesync_client::CatalogClient;
use moviesync_core::datasource::{
    DataSource, DataSourceError, ItemStream, LocalStore, QueryOptions, SortOrder,
};
use moviesync_core::movie::{movie_order, FavoriteMovie, Movie};

use crate::config::Config;
use crate::decorator::ServiceDecorator;
use crate::repository::{Repository, WritePolicy};
use crate::storage::{CatalogRemoteStore, InMemoryStore, OfflineRemote};
use crate::stream::first_emission;

/// Movies: any local store in front of the catalog.
pub type MovieRepository = Repository<Movie, dyn LocalStore<Movie>, dyn DataSource<Movie>>;

/// Favorites never leave the device.
pub type FavoriteRepository =
    Repository<FavoriteMovie, dyn LocalStore<FavoriteMovie>, OfflineRemote<FavoriteMovie>>;

/// How to read the movie list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListMovies {
    pub sort: Option<SortOrder>,
    pub page: Option<u32>,
    /// Invalidate the repository first.
    pub refresh: bool,
    /// Bypass the repository and ask the catalog directly.
    pub direct: bool,
}

/// Shared application state.
#[derive(Clone)]
pub struct App {
    pub movies: MovieRepository,
    pub favorites: FavoriteRepository,
    catalog: Arc<dyn DataSource<Movie>>,
    client: Arc<CatalogClient>,
}

impl App {
    /// Assembles the application from already built stores.
    ///
    /// `catalog` serves as the movie repository's remote store and as the
    /// service behind direct listings.
    pub fn new(
        client: Arc<CatalogClient>,
        catalog: Arc<dyn DataSource<Movie>>,
        movies_local: Arc<dyn LocalStore<Movie>>,
        favorites_local: Arc<dyn LocalStore<FavoriteMovie>>,
        policy: WritePolicy,
    ) -> Self {
        Self {
            movies: Repository::new(movies_local, Arc::clone(&catalog)).with_policy(policy),
            favorites: Repository::new(favorites_local, Arc::new(OfflineRemote::new()))
                .with_policy(policy),
            catalog,
            client,
        }
    }

    /// Builds the application with in-memory local stores. Nothing survives
    /// the process.
    pub fn ephemeral(config: &Config) -> Result<Self> {
        let (client, catalog) = connect_catalog(config)?;

        Ok(Self::new(
            client,
            catalog,
            Arc::new(InMemoryStore::new().with_sorter(movie_order)),
            Arc::new(InMemoryStore::<FavoriteMovie>::new()),
            config.write_policy,
        ))
    }

    /// Builds the application with both local stores in the SQLite file at
    /// `config.db_path`, sharing one connection.
    #[cfg(feature = "sqlite")]
    pub async fn open(config: &Config) -> Result<Self> {
        use crate::storage::sqlite::{FavoriteRows, MovieRows, SqliteStore};

        let (client, catalog) = connect_catalog(config)?;

        let conn = tokio_rusqlite::Connection::open(&config.db_path)
            .await
            .with_context(|| format!("Failed to open database {}", config.db_path))?;
        let movies = SqliteStore::<MovieRows>::with_connection(conn.clone()).await?;
        let favorites = SqliteStore::<FavoriteRows>::with_connection(conn).await?;

        tracing::info!(db_path = %config.db_path, "Using SQLite local stores");

        Ok(Self::new(
            client,
            catalog,
            Arc::new(movies),
            Arc::new(favorites),
            config.write_policy,
        ))
    }

    /// Lists movies.
    ///
    /// Without options the list comes from a [`ServiceDecorator`] over the
    /// movie repository, so an empty repository falls back to the catalog's
    /// popular movies. With options both stores are queried and their order
    /// is kept.
    pub async fn list_movies(&self, request: ListMovies) -> Result<Vec<Movie>> {
        if request.refresh {
            self.movies.refresh();
        }

        if request.sort.is_some() || request.page.is_some() {
            let mut options = QueryOptions::new();
            if let Some(sort) = request.sort {
                options = options.sort_by(sort);
            }
            if let Some(page) = request.page {
                options = options.page(page);
            }
            return or_empty(first_emission(self.movies.get_items_with(options)).await);
        }

        let decorator: ServiceDecorator<Movie, _, _> = ServiceDecorator::new(
            self.movies.clone(),
            Arc::clone(&self.catalog),
            QueryOptions::new().sort_by(SortOrder::Popularity),
        );
        if request.direct {
            decorator.mark_dirty();
        }

        let mut movies = or_empty(first_emission(decorator.get_items()).await)?;
        movies.sort_by(|a, b| movie_order(SortOrder::Popularity, a, b));
        Ok(movies)
    }

    /// Looks up one movie through the cache, the local store and the catalog.
    pub async fn show_movie(&self, id: &str) -> Result<Movie> {
        first_emission(self.movies.get_item(id))
            .await?
            .flatten()
            .ok_or_else(|| anyhow!("Movie {id} not found"))
    }

    /// Returns the artwork URL of a movie's poster.
    pub async fn poster_url(&self, id: &str, size: &str) -> Result<String> {
        let movie = self.show_movie(id).await?;
        let path = movie
            .poster_path
            .ok_or_else(|| anyhow!("Movie {id} has no poster"))?;
        let url = self.client.image_url(size, &path)?;
        Ok(url.to_string())
    }

    /// Marks a movie as favorite, looking it up first.
    pub async fn add_favorite(&self, id: &str) -> Result<FavoriteMovie> {
        let movie = self.show_movie(id).await?;
        let favorite = FavoriteMovie::from_movie(&movie);
        self.favorites
            .add(&favorite)
            .await
            .with_context(|| format!("Failed to save favorite {id}"))?;
        Ok(favorite)
    }

    pub async fn remove_favorite(&self, id: &str) -> Result<()> {
        self.favorites
            .remove(id)
            .await
            .with_context(|| format!("Failed to remove favorite {id}"))
    }

    /// Lists favorites, most recently added first.
    pub async fn list_favorites(&self) -> Result<Vec<FavoriteMovie>> {
        let mut favorites = or_empty(first_emission(self.favorites.get_items()).await)?;
        favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at).then_with(|| a.id.cmp(&b.id)));
        Ok(favorites)
    }

    /// Emits the favorites list now and after every change.
    pub fn watch_favorites(&self) -> ItemStream<'_, Vec<FavoriteMovie>> {
        self.favorites.observe_items()
    }
}

type Catalog = (Arc<CatalogClient>, Arc<dyn DataSource<Movie>>);

fn connect_catalog(config: &Config) -> Result<Catalog> {
    if config.api_key.is_none() {
        tracing::warn!("MOVIESYNC_API_KEY is not set, catalog requests will fail");
    }

    let client = CatalogClient::new(&config.api_url, config.api_key.clone())
        .with_image_base_url(&config.image_url)
        .with_timeout(config.request_timeout())
        .context("Failed to build catalog client")?;
    let client = Arc::new(client);
    let catalog: Arc<dyn DataSource<Movie>> =
        Arc::new(CatalogRemoteStore::new(Arc::clone(&client)));

    Ok((client, catalog))
}

/// "No data anywhere" is an empty list to the user.
fn or_empty<T>(result: Result<Option<Vec<T>>, DataSourceError>) -> Result<Vec<T>> {
    match result {
        Ok(items) => Ok(items.unwrap_or_default()),
        Err(err) if err.is_no_data() => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}
