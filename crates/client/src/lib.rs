//! moviesync_client - HTTP client for the upstream movie catalog API.

pub mod client;
pub mod error;

pub use client::{CatalogClient, DiscoverQuery};
pub use error::{ClientError, Result};
