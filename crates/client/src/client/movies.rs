//! Movie catalog operations.

use moviesync_core::movie::{MovieDto, Page};

use super::CatalogClient;
use crate::error::{ClientError, Result};

/// Query parameters for the discover listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverQuery {
    /// Catalog sort key, e.g. `popularity.desc`.
    pub sort_by: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl DiscoverQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(sort_by) = &self.sort_by {
            params.push(("sort_by", sort_by.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }
}

impl CatalogClient {
    /// List one page of the discover endpoint.
    pub async fn discover_movies(&self, query: &DiscoverQuery) -> Result<Page<MovieDto>> {
        let url = self.url("/discover/movie", &query.params())?;
        tracing::debug!(sort_by = ?query.sort_by, page = ?query.page, "Discovering movies");
        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    /// Get a movie by its catalog id. Returns `None` on 404.
    pub async fn get_movie(&self, id: u64) -> Result<Option<MovieDto>> {
        let url = self.url(&format!("/movie/{}", id), &[])?;
        let response = self.client.get(url).send().await?;
        if response.status().as_u16() == 404 {
            tracing::debug!(movie_id = id, "Movie not in catalog");
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Build the artwork URL for a poster or backdrop path.
    ///
    /// `size` is a catalog size bucket such as `w185`, `w500` or `original`.
    pub fn image_url(&self, size: &str, path: &str) -> Result<url::Url> {
        let path = path.trim_start_matches('/');
        url::Url::parse(&format!("{}/{}/{}", self.image_base_url, size, path))
            .map_err(ClientError::from)
    }
}
