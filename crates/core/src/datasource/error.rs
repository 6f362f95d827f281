use std::fmt;

use thiserror::Error;

/// Identifies one of the two backing stores behind a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Local,
    Remote,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Local => f.write_str("local"),
            StoreKind::Remote => f.write_str("remote"),
        }
    }
}

/// Errors that can occur during data source operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("No {entity_type} data available from any source")]
    NoData { entity_type: &'static str },
    #[error("Unsupported query options: {}", keys.join(", "))]
    UnsupportedQuery { keys: Vec<String> },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Partial write failure: {succeeded} store succeeded, {failed} store failed: {source}")]
    PartialWriteFailure {
        succeeded: StoreKind,
        failed: StoreKind,
        source: Box<DataSourceError>,
    },
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl DataSourceError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns true for `NoData`, the "nothing anywhere" read outcome.
    pub fn is_no_data(&self) -> bool {
        matches!(self, DataSourceError::NoData { .. })
    }

    /// Returns the underlying store error of a `PartialWriteFailure`, or
    /// `self` for every other variant.
    pub fn root(&self) -> &DataSourceError {
        match self {
            DataSourceError::PartialWriteFailure { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for data source operations.
pub type Result<T> = std::result::Result<T, DataSourceError>;
