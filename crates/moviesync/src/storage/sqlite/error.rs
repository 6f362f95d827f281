//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `DataSourceError`.
//! Missing rows become `NotFound`, undecodable rows become `InvalidData`,
//! everything else is a `Transport` failure of the local store.

use moviesync_core::datasource::DataSourceError;

/// Maps a rusqlite error to a DataSourceError.
fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: &str) -> DataSourceError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => DataSourceError::not_found(entity_type, id),

        // Stored row could not be decoded back into the entity
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => {
            DataSourceError::InvalidData(format!("Malformed {entity_type} row: {err}"))
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            DataSourceError::Transport(format!("Cannot open database: {err}"))
        }

        _ => DataSourceError::Transport(format!("SQLite error: {err}")),
    }
}

/// Maps a tokio_rusqlite error to a DataSourceError.
///
/// This is the main entry point for error mapping in async code. `id` names
/// the row the statement addressed and ends up in `NotFound`.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl AsRef<str>,
) -> DataSourceError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, id.as_ref())
        }
        tokio_rusqlite::Error::Close(_) | tokio_rusqlite::Error::ConnectionClosed => {
            DataSourceError::Transport("Connection closed unexpectedly".to_string())
        }
        _ => DataSourceError::Transport(err.to_string()),
    }
}
