//! Upstream catalog wire types and their pure conversions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_null_as_empty, deserialize_optional_date, deserialize_optional_string};

use super::Movie;

/// One page of a paginated catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// A movie as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub overview: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
}

/// Converts a catalog movie into the client entity.
///
/// The upstream numeric id becomes the entity id, so the same title keeps
/// the same id in cache, local storage and the catalog.
pub fn movie_from_dto(dto: MovieDto) -> Movie {
    Movie {
        id: dto.id.to_string(),
        deleted: false,
        title: dto.title,
        overview: dto.overview,
        poster_path: dto.poster_path,
        backdrop_path: dto.backdrop_path,
        release_date: dto.release_date,
        vote_average: dto.vote_average,
        vote_count: dto.vote_count,
        popularity: dto.popularity,
    }
}

/// Converts every result of a page, preserving upstream order.
pub fn movies_from_page(page: Page<MovieDto>) -> Vec<Movie> {
    page.results.into_iter().map(movie_from_dto).collect()
}
