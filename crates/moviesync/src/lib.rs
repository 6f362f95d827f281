//! moviesync - Offline-first movie catalog browsing.
//!
//! Every entity type is served by a [`Repository`] that stacks an in-memory
//! cache over a local store and a remote store. Movies come from the catalog
//! API and are kept locally; favorites live on the device only.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod decorator;
pub mod output;
pub mod repository;
pub mod storage;
pub mod stream;

#[cfg(test)]
pub(crate) mod testing;

pub use app::App;
pub use cache::EntityCache;
pub use config::Config;
pub use decorator::ServiceDecorator;
pub use repository::{Repository, WritePolicy};
