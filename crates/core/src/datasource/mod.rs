//! Data source contract shared by local, remote and composite stores.

mod error;
mod options;
mod traits;

pub use error::{DataSourceError, Result, StoreKind};
pub use options::{QueryOptions, SortOrder, PAGE, PAGE_SIZE, SORT_BY};
pub use traits::{DataSource, ItemStream, LocalStore};
