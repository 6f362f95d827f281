//! Query options accepted by `DataSource::get_items_with`.
//!
//! Options are a plain string map so that every store can receive the same
//! value; each store validates the keys it understands with
//! [`QueryOptions::ensure_supported`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{DataSourceError, Result};

/// Option key selecting the sort order.
pub const SORT_BY: &str = "sort_by";

/// Option key selecting a 1-based result page.
pub const PAGE: &str = "page";

/// Number of rows per page for stores that paginate locally.
pub const PAGE_SIZE: usize = 20;

/// Sort orders understood by the catalog and the local stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Popularity,
    Rating,
    ReleaseDate,
}

impl SortOrder {
    /// Returns the wire value used by the catalog API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Popularity => "popularity.desc",
            SortOrder::Rating => "vote_average.desc",
            SortOrder::ReleaseDate => "release_date.desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "popularity.desc" | "popularity" => Ok(SortOrder::Popularity),
            "vote_average.desc" | "rating" => Ok(SortOrder::Rating),
            "release_date.desc" | "release_date" => Ok(SortOrder::ReleaseDate),
            other => Err(DataSourceError::InvalidData(format!(
                "unknown sort order: {other}"
            ))),
        }
    }
}

/// Source-specific filtering and sorting parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    values: BTreeMap<String, String>,
}

impl QueryOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an option.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Sets the sort order.
    pub fn sort_by(self, order: SortOrder) -> Self {
        self.with(SORT_BY, order.as_str())
    }

    /// Sets the 1-based page.
    pub fn page(self, page: u32) -> Self {
        self.with(PAGE, page.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fails with `UnsupportedQuery` listing every key not in `supported`.
    pub fn ensure_supported(&self, supported: &[&str]) -> Result<()> {
        let unsupported: Vec<String> = self
            .values
            .keys()
            .filter(|key| !supported.contains(&key.as_str()))
            .cloned()
            .collect();

        if unsupported.is_empty() {
            Ok(())
        } else {
            Err(DataSourceError::UnsupportedQuery { keys: unsupported })
        }
    }

    /// Parses the `sort_by` option, if present.
    pub fn sort_order(&self) -> Result<Option<SortOrder>> {
        self.get(SORT_BY).map(str::parse::<SortOrder>).transpose()
    }

    /// Parses the `page` option, if present. Pages start at 1.
    pub fn page_number(&self) -> Result<Option<u32>> {
        match self.get(PAGE) {
            None => Ok(None),
            Some(raw) => match raw.parse::<u32>() {
                Ok(page) if page >= 1 => Ok(Some(page)),
                _ => Err(DataSourceError::InvalidData(format!("invalid page: {raw}"))),
            },
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryOptions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
