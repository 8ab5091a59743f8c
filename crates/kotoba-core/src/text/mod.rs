//! Text helpers for dictionary bank fields

use serde_json::Value;

/// Split a space-separated field into its parts.
///
/// Dictionary banks encode tag and reading lists as single strings
/// (`"n vs"`, `"ダ テイ"`); missing or empty fields yield an empty list.
pub fn split_field(field: &str) -> Vec<String> {
    field.split_whitespace().map(str::to_string).collect()
}

/// Split a JSON field that is either a space-separated string or an array of strings.
///
/// Anything else (null, numbers, objects) is treated as absent.
pub fn split_value(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => split_field(s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(split_field)
            .collect(),
        _ => Vec::new(),
    }
}
