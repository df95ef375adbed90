//! Formatting utilities for CLI output.
//!
//! Command output is meant to be piped into bars and scripts, so only
//! errors carry terminal styling.

use crate::services::mpris::{ChangeEvent, MetadataMap, TypedArray, Variant};

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Red color
    pub const RED: &'static str = "\x1b[31m";
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats a bus value for human-readable CLI output.
///
/// Scalars print bare, string lists are comma separated and dictionaries
/// fall back to JSON.
///
/// # Examples
///
/// ```
/// use musicwand::cli::formatting::format_variant;
/// use musicwand::services::mpris::Variant;
///
/// assert_eq!(format_variant(&Variant::from("Get Lucky")), "Get Lucky");
/// assert_eq!(format_variant(&Variant::from(42_i64)), "42");
/// ```
pub fn format_variant(value: &Variant) -> String {
    match value {
        Variant::Bool(b) => b.to_string(),
        Variant::Byte(u) => u.to_string(),
        Variant::Int16(i) => i.to_string(),
        Variant::UInt16(u) => u.to_string(),
        Variant::Int32(i) => i.to_string(),
        Variant::Int64(i) => i.to_string(),
        Variant::UInt32(u) => u.to_string(),
        Variant::UInt64(u) => u.to_string(),
        Variant::Double(d) => d.to_string(),
        Variant::Str(s) | Variant::ObjectPath(s) | Variant::Signature(s) => s.clone(),
        Variant::StrList(items) => items.join(", "),
        Variant::List(items) | Variant::Array(TypedArray { items, .. }) => items
            .iter()
            .map(format_variant)
            .collect::<Vec<_>>()
            .join(", "),
        Variant::Struct(_) | Variant::Dict(_) | Variant::Map(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

/// One `key<TAB>value` line per metadata entry, sorted by key.
pub fn format_metadata(metadata: &MetadataMap) -> String {
    metadata
        .iter()
        .map(|(key, value)| format!("{key}\t{}", format_variant(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Metadata as a pretty-printed JSON object.
///
/// # Errors
/// Returns error if a value cannot be serialized
pub fn format_metadata_json(metadata: &MetadataMap) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(metadata)
}

/// Line printed by `mw watch` for one change notification.
pub fn format_change(bus_name: &str, event: &ChangeEvent) -> String {
    let changed = serde_json::to_string(&event.changed).unwrap_or_default();
    format!("CHANGE {bus_name} {changed}")
}

/// Entry in the `mw players` listing, starred when current.
pub fn format_player_entry(name: &str, current: bool) -> String {
    let marker = if current { '*' } else { ' ' };
    format!("{marker} {name}")
}
