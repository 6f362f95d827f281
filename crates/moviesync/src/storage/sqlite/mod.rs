//! SQLite local store.
//!
//! One table per entity type, described by a [`RowMapping`]. Uses `rusqlite`
//! for the statements and `tokio-rusqlite` to run them off the async runtime.

mod conversions;
mod error;
mod schema;
mod store;

pub use conversions::{FavoriteRows, MovieRows, RowMapping};
pub use store::SqliteStore;
