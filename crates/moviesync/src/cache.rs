//! In-memory entity cache owned by a single repository.
//!
//! Every access goes through one `RwLock`, so concurrent reads and writes on
//! the same repository never observe a torn map.

use std::collections::HashMap;

use tokio::sync::RwLock;

use moviesync_core::Entity;

/// Map from entity id to the most recently observed value.
pub struct EntityCache<E: Entity> {
    entries: RwLock<HashMap<String, E>>,
}

impl<E: Entity> Default for EntityCache<E> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<E: Entity> EntityCache<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<E> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.entries.read().await.contains_key(id)
    }

    /// Folds one item into the cache and returns the value it replaced.
    pub async fn fold(&self, item: &E) -> Option<E> {
        self.entries
            .write()
            .await
            .insert(item.id().to_string(), item.clone())
    }

    /// Folds every item, returning the replaced values in input order.
    pub async fn fold_all(&self, items: &[E]) -> Vec<Option<E>> {
        let mut entries = self.entries.write().await;
        items
            .iter()
            .map(|item| entries.insert(item.id().to_string(), item.clone()))
            .collect()
    }

    /// Removes one entry and returns it.
    pub async fn evict(&self, id: &str) -> Option<E> {
        self.entries.write().await.remove(id)
    }

    /// Empties the cache and returns what it held.
    pub async fn clear(&self) -> Vec<E> {
        self.entries.write().await.drain().map(|(_, v)| v).collect()
    }

    /// Returns every cached value. Order is unspecified.
    pub async fn snapshot(&self) -> Vec<E> {
        self.entries.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moviesync_core::movie::Movie;

    fn movie(id: &str, title: &str) -> Movie {
        Movie::new(title).with_id(id)
    }

    #[tokio::test]
    async fn test_fold_returns_previous_value() {
        let cache = EntityCache::new();

        assert!(cache.fold(&movie("1", "Alien")).await.is_none());
        let previous = cache.fold(&movie("1", "Aliens")).await;

        assert_eq!(previous.map(|m| m.title), Some("Alien".to_string()));
        assert_eq!(cache.get("1").await.unwrap().title, "Aliens");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_fold_all_and_snapshot() {
        let cache = EntityCache::new();
        cache.fold(&movie("2", "Old")).await;

        let previous = cache
            .fold_all(&[movie("1", "Alien"), movie("2", "Heat")])
            .await;

        assert_eq!(previous.len(), 2);
        assert!(previous[0].is_none());
        assert_eq!(previous[1].as_ref().map(|m| m.title.as_str()), Some("Old"));

        let mut ids: Vec<_> = cache.snapshot().await.into_iter().map(|m| m.id).collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_evict_and_clear() {
        let cache = EntityCache::new();
        cache
            .fold_all(&[movie("1", "Alien"), movie("2", "Heat")])
            .await;

        assert!(cache.evict("1").await.is_some());
        assert!(cache.evict("1").await.is_none());
        assert!(!cache.contains("1").await);

        let cleared = cache.clear().await;
        assert_eq!(cleared.len(), 1);
        assert!(cache.is_empty().await);
    }
}
