//! JSON rendering.

use serde::Serialize;

/// Serializes `value` as compact JSON. Serialization failures are logged
/// and rendered as `null`.
pub fn to_line<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(line) => line,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to serialize output");
            "null".to_string()
        }
    }
}
