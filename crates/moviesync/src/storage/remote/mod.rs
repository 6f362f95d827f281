//! Remote stores.
//!
//! Read-mostly sources backed by something the client does not own. Every
//! write is an immediate no-op success.

mod catalog;
mod offline;

pub use catalog::{CatalogApi, CatalogRemoteStore};
pub use offline::OfflineRemote;
