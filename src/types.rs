//! Common types used throughout study-lake
//!
//! Shared type aliases and small helpers used across modules.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, keys kept in document order
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Value Rendering
// ============================================================================

/// Render a JSON value as plain text
///
/// Strings are returned without quotes, booleans as `true`/`false`,
/// numbers in their JSON form and null as an empty string. Arrays and
/// objects fall back to compact JSON.
pub fn value_to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}
