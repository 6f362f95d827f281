//! End-to-end runs of the repository over real local stores, with an
//! in-process catalog standing in for the network.

use std::sync::Arc;

use futures_util::StreamExt;

use moviesync::storage::{InMemoryStore, OfflineRemote};
use moviesync::stream::first_emission;
use moviesync::{Repository, WritePolicy};
use moviesync_core::datasource::{DataSource, DataSourceError, QueryOptions, SortOrder};
use moviesync_core::movie::{movie_order, FavoriteMovie, Movie};

fn movie(id: &str, popularity: f64) -> Movie {
    Movie::new(format!("Movie {id}"))
        .with_id(id)
        .with_popularity(popularity)
}

fn catalog(movies: Vec<Movie>) -> Arc<InMemoryStore<Movie>> {
    Arc::new(InMemoryStore::from_items(movies).with_sorter(movie_order))
}

async fn ids<S: DataSource<Movie>>(source: &S) -> Vec<String> {
    first_emission(source.get_items())
        .await
        .unwrap()
        .unwrap_or_default()
        .into_iter()
        .map(|m| m.id)
        .collect()
}

#[tokio::test]
async fn seeded_remote_fills_empty_local_store() {
    let local = Arc::new(InMemoryStore::<Movie>::new());
    let remote = catalog(vec![movie("m1", 1.0), movie("m2", 2.0)]);
    let repository = Repository::new(Arc::clone(&local), remote);

    assert_eq!(ids(&repository).await, vec!["m1", "m2"]);
    assert_eq!(repository.cache().len().await, 2);
    assert!(!repository.is_dirty());
    assert_eq!(ids(local.as_ref()).await, vec!["m1", "m2"]);
}

#[tokio::test]
async fn persisted_items_are_served_without_network() {
    let local = Arc::new(InMemoryStore::<Movie>::new());
    let online = Repository::new(Arc::clone(&local), catalog(vec![movie("m1", 1.0)]));
    assert_eq!(ids(&online).await, vec!["m1"]);

    // A fresh process: empty cache, same local data, no catalog.
    let offline = Repository::new(Arc::clone(&local), Arc::new(OfflineRemote::<Movie>::new()));
    assert_eq!(ids(&offline).await, vec!["m1"]);

    let missing = first_emission(offline.get_item("m9")).await.unwrap();
    assert_eq!(missing, Some(None));
}

#[tokio::test]
async fn offline_with_nothing_stored_reports_no_data() {
    let repository = Repository::new(
        Arc::new(InMemoryStore::<Movie>::new()),
        Arc::new(OfflineRemote::<Movie>::new()),
    );

    let result = first_emission(repository.get_items()).await;
    assert_eq!(
        result,
        Err(DataSourceError::NoData {
            entity_type: "Movie"
        })
    );
}

#[tokio::test]
async fn refresh_picks_up_catalog_changes() {
    let remote = catalog(vec![movie("m1", 1.0)]);
    let repository = Repository::new(Arc::new(InMemoryStore::<Movie>::new()), Arc::clone(&remote));
    assert_eq!(ids(&repository).await, vec!["m1"]);

    remote.add(&movie("m2", 5.0)).await.unwrap();
    assert_eq!(ids(&repository).await, vec!["m1"]);

    repository.refresh();
    assert_eq!(ids(&repository).await, vec!["m1", "m2"]);
    assert!(!repository.is_dirty());
}

#[tokio::test]
async fn sorted_query_reaches_both_stores() {
    let repository = Repository::new(
        Arc::new(InMemoryStore::<Movie>::new().with_sorter(movie_order)),
        catalog(vec![movie("a", 1.0), movie("b", 3.0), movie("c", 2.0)]),
    );

    let sorted = first_emission(
        repository.get_items_with(QueryOptions::new().sort_by(SortOrder::Popularity)),
    )
    .await
    .unwrap()
    .unwrap();

    let sorted: Vec<_> = sorted.into_iter().map(|m| m.id).collect();
    assert_eq!(sorted, vec!["b", "c", "a"]);
}

#[tokio::test]
async fn update_unknown_everywhere_leaves_no_trace() {
    let local = Arc::new(InMemoryStore::<Movie>::new());
    let repository = Repository::new(Arc::clone(&local), catalog(Vec::new()))
        .with_policy(WritePolicy::Compensate);

    // Neither store knows the id, so the update fails on both sides.
    let err = repository.update(&movie("ghost", 1.0)).await.unwrap_err();
    assert!(matches!(err.root(), DataSourceError::NotFound { .. }));
    assert!(repository.cache().is_empty().await);
    assert!(ids(local.as_ref()).await.is_empty());
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use moviesync::storage::sqlite::{FavoriteRows, MovieRows, SqliteStore};

    #[tokio::test]
    async fn seeded_scenario_over_sqlite() {
        let local = Arc::new(SqliteStore::<MovieRows>::open_in_memory().await.unwrap());
        let repository = Repository::new(
            Arc::clone(&local),
            catalog(vec![movie("m1", 1.0), movie("m2", 2.0)]),
        );

        assert_eq!(ids(&repository).await, vec!["m1", "m2"]);
        assert_eq!(repository.cache().len().await, 2);
        assert_eq!(ids(local.as_ref()).await, vec!["m1", "m2"]);

        // Running again from a cold cache hits the SQLite rows first.
        let cold = Repository::new(Arc::clone(&local), Arc::new(OfflineRemote::<Movie>::new()));
        assert_eq!(ids(&cold).await, vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn favorites_flow_over_sqlite() {
        let local = Arc::new(SqliteStore::<FavoriteRows>::open_in_memory().await.unwrap());
        let favorites = Repository::new(
            Arc::clone(&local),
            Arc::new(OfflineRemote::<FavoriteMovie>::new()),
        );

        let mut watch = favorites.observe_items();
        assert_eq!(watch.next().await.unwrap().unwrap(), Vec::new());

        let heat = FavoriteMovie::from_movie(&movie("949", 1.0));
        favorites.add(&heat).await.unwrap();

        let seen = watch.next().await.unwrap().unwrap();
        assert_eq!(seen, vec![heat.clone()]);
        assert!(favorites.cache().contains("949").await);

        favorites.remove("949").await.unwrap();
        assert_eq!(watch.next().await.unwrap().unwrap(), Vec::new());
        assert!(local.get_items().next().await.unwrap().unwrap().is_empty());
    }
}
