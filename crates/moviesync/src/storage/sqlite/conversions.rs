//! Row mappings between SQLite and the domain entities.
//!
//! Pure functions, testable without a database.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::Row;

use moviesync_core::datasource::SortOrder;
use moviesync_core::movie::{FavoriteMovie, Movie};
use moviesync_core::Entity;

use super::schema::Column;

/// Describes how one entity type is laid out in its table.
///
/// `COLUMNS` must contain an `id` column; `to_values` and `from_row` use the
/// same column order.
pub trait RowMapping: Send + Sync + 'static {
    type Entity: Entity;

    const TABLE: &'static str;
    const COLUMNS: &'static [Column];

    fn to_values(entity: &Self::Entity) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self::Entity>;

    /// `ORDER BY` clause for a sort order, or `None` when the table cannot
    /// be sorted that way.
    fn order_by(order: SortOrder) -> Option<&'static str>;
}

// ============================================================================
// Movie
// ============================================================================

/// Table layout for [`Movie`].
pub struct MovieRows;

impl RowMapping for MovieRows {
    type Entity = Movie;

    const TABLE: &'static str = "movies";
    const COLUMNS: &'static [Column] = &[
        ("id", "TEXT NOT NULL UNIQUE"),
        ("deleted", "INTEGER NOT NULL DEFAULT 0"),
        ("title", "TEXT NOT NULL"),
        ("overview", "TEXT NOT NULL"),
        ("poster_path", "TEXT"),
        ("backdrop_path", "TEXT"),
        ("release_date", "TEXT"),
        ("vote_average", "REAL NOT NULL"),
        ("vote_count", "INTEGER NOT NULL"),
        ("popularity", "REAL NOT NULL"),
    ];

    fn to_values(movie: &Movie) -> Vec<Value> {
        vec![
            Value::from(movie.id.clone()),
            Value::from(movie.deleted),
            Value::from(movie.title.clone()),
            Value::from(movie.overview.clone()),
            Value::from(movie.poster_path.clone()),
            Value::from(movie.backdrop_path.clone()),
            Value::from(movie.release_date.as_ref().map(format_date)),
            Value::from(movie.vote_average),
            Value::from(movie.vote_count),
            Value::from(movie.popularity),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Movie> {
        let release_date: Option<String> = row.get(6)?;

        Ok(Movie {
            id: row.get(0)?,
            deleted: row.get(1)?,
            title: row.get(2)?,
            overview: row.get(3)?,
            poster_path: row.get(4)?,
            backdrop_path: row.get(5)?,
            release_date: release_date.as_deref().map(parse_date).transpose()?,
            vote_average: row.get(7)?,
            vote_count: row.get(8)?,
            popularity: row.get(9)?,
        })
    }

    fn order_by(order: SortOrder) -> Option<&'static str> {
        Some(match order {
            SortOrder::Popularity => "popularity DESC, id ASC",
            SortOrder::Rating => "vote_average DESC, id ASC",
            SortOrder::ReleaseDate => "release_date IS NULL, release_date DESC, id ASC",
        })
    }
}

// ============================================================================
// FavoriteMovie
// ============================================================================

/// Table layout for [`FavoriteMovie`]. Favorites are listed in the order
/// they were added and support no sort option.
pub struct FavoriteRows;

impl RowMapping for FavoriteRows {
    type Entity = FavoriteMovie;

    const TABLE: &'static str = "favorites";
    const COLUMNS: &'static [Column] = &[
        ("id", "TEXT NOT NULL UNIQUE"),
        ("deleted", "INTEGER NOT NULL DEFAULT 0"),
        ("title", "TEXT NOT NULL"),
        ("poster_path", "TEXT"),
        ("added_at", "TEXT NOT NULL"),
    ];

    fn to_values(favorite: &FavoriteMovie) -> Vec<Value> {
        vec![
            Value::from(favorite.id.clone()),
            Value::from(favorite.deleted),
            Value::from(favorite.title.clone()),
            Value::from(favorite.poster_path.clone()),
            Value::from(format_datetime(&favorite.added_at)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<FavoriteMovie> {
        let added_at: String = row.get(4)?;

        Ok(FavoriteMovie {
            id: row.get(0)?,
            deleted: row.get(1)?,
            title: row.get(2)?,
            poster_path: row.get(3)?,
            added_at: parse_datetime(&added_at)?,
        })
    }

    fn order_by(_order: SortOrder) -> Option<&'static str> {
        None
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Parse a date string (YYYY-MM-DD).
pub fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Parse an RFC 3339 datetime string.
pub fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_movie_values_follow_column_order() {
        let movie = Movie::new("Heat")
            .with_id("949")
            .with_release_date(NaiveDate::from_ymd_opt(1995, 12, 15).unwrap())
            .with_rating(7.9, 6000);

        let values = MovieRows::to_values(&movie);

        assert_eq!(values.len(), MovieRows::COLUMNS.len());
        assert_eq!(values[0], Value::Text("949".to_string()));
        assert_eq!(values[4], Value::Null);
        assert_eq!(values[6], Value::Text("1995-12-15".to_string()));
        assert_eq!(values[8], Value::Integer(6000));
    }

    #[test]
    fn test_favorite_values_follow_column_order() {
        let added_at = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let favorite = FavoriteMovie::from_movie(&Movie::new("Heat").with_id("949"))
            .with_added_at(added_at);

        let values = FavoriteRows::to_values(&favorite);

        assert_eq!(values.len(), FavoriteRows::COLUMNS.len());
        assert_eq!(values[1], Value::Integer(0));
        assert_eq!(values[4], Value::Text(format_datetime(&added_at)));
    }

    #[test]
    fn test_first_column_is_id() {
        assert_eq!(MovieRows::COLUMNS[0].0, "id");
        assert_eq!(FavoriteRows::COLUMNS[0].0, "id");
    }

    #[test]
    fn test_movies_sort_every_order_favorites_none() {
        assert!(MovieRows::order_by(SortOrder::ReleaseDate).is_some());
        assert_eq!(
            MovieRows::order_by(SortOrder::Rating),
            Some("vote_average DESC, id ASC")
        );
        assert!(FavoriteRows::order_by(SortOrder::Popularity).is_none());
    }

    #[test]
    fn test_format_datetime() {
        let dt = DateTime::parse_from_rfc3339("2024-06-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let formatted = format_datetime(&dt);
        assert!(formatted.starts_with("2024-06-15"));
        assert!(formatted.contains("10:30:00"));
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(format_date(&date), "2024-06-15");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("1999-10-15").unwrap(),
            NaiveDate::from_ymd_opt(1999, 10, 15).unwrap()
        );
        assert!(parse_date("15/10/1999").is_err());
    }

    #[test]
    fn test_parse_datetime() {
        assert!(parse_datetime("2024-06-15T10:30:00+00:00").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }
}
