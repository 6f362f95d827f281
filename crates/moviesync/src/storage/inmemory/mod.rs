//! In-memory local store.
//!
//! Keeps entities in a `BTreeMap` wrapped in `Arc<RwLock<_>>` and publishes
//! a change counter over a `watch` channel so `observe_items` can re-emit.
//! Nothing survives the process; use it for tests and `--ephemeral` runs.

mod store;

pub use store::{InMemoryStore, Sorter};
