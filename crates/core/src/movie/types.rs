use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{new_entity_id, Entity};

/// A catalog title as cached and persisted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Upstream numeric id rendered as a string, or a client UUID.
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
}

impl Movie {
    /// Creates a movie with a fresh client-generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            deleted: false,
            title: title.into(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
        }
    }

    /// Sets a specific ID for this movie (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    pub fn with_poster_path(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Sets average rating and vote count.
    pub fn with_rating(mut self, vote_average: f64, vote_count: u32) -> Self {
        self.vote_average = vote_average;
        self.vote_count = vote_count;
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = popularity;
        self
    }

    /// Returns the release year, if the release date is known.
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

impl Entity for Movie {
    const ENTITY_TYPE: &'static str = "Movie";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A movie the user marked as favorite, kept only on the device.
///
/// Shares its id with the movie it points to, so favoriting the same movie
/// twice is an upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteMovie {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
    pub title: String,
    pub poster_path: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl FavoriteMovie {
    /// Creates a favorite snapshot of the given movie.
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            id: movie.id.clone(),
            deleted: false,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            added_at: Utc::now(),
        }
    }

    /// Sets the time the favorite was recorded (useful for testing).
    pub fn with_added_at(mut self, added_at: DateTime<Utc>) -> Self {
        self.added_at = added_at;
        self
    }
}

impl Entity for FavoriteMovie {
    const ENTITY_TYPE: &'static str = "FavoriteMovie";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}
