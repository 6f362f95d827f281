//! Backing store implementations.
//!
//! Local stores implement `LocalStore`, remote stores implement
//! `DataSource` with no-op writes. The durable SQLite store is compiled with
//! the `sqlite` feature (on by default).
//!
//! Build without SQLite:
//! ```bash
//! cargo build -p moviesync --no-default-features
//! ```

pub mod inmemory;
pub mod remote;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryStore;
pub use remote::{CatalogApi, CatalogRemoteStore, OfflineRemote};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
