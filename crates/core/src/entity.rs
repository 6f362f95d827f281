//! Base record contract shared by every stored type.

use uuid::Uuid;

/// A record addressable by a stable string identifier.
///
/// Two values are the same logical record iff their ids are equal. The id
/// never changes after creation; implementors must not expose a setter.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human readable type name used in error messages and logs.
    const ENTITY_TYPE: &'static str;

    /// Returns the globally unique identifier of this record.
    fn id(&self) -> &str;

    /// Returns the soft-delete marker. Interpretation is left to the stores.
    fn is_deleted(&self) -> bool;
}

/// Generates a fresh client-side identifier (UUID v4, hyphenated).
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}
