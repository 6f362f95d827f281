//! moviesync_core - functional core for the moviesync project.
//!
//! Holds the entity model, the catalog wire types and the `DataSource`
//! contract shared by the local, remote and composite stores. Nothing in
//! this crate performs I/O.

pub mod datasource;
pub mod entity;
pub mod movie;
pub mod serde;

pub use entity::{new_entity_id, Entity};
