//! Rendering of command results for the terminal.

pub mod json;
pub mod pretty;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Renders `value` as one JSON line, or with `pretty` for humans.
pub fn render<T>(
    value: &T,
    format: OutputFormat,
    pretty: impl FnOnce(&T) -> String,
) -> String
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Json => json::to_line(value),
        OutputFormat::Pretty => pretty(value),
    }
}
