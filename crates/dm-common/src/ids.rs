//! Identifier normalization at ingestion boundaries.
//!
//! The source documents mix numeric and string identifiers for the same
//! entities (a candidate appears as `31000` in one file and `"31000"` in
//! another). Every id is coerced to a trimmed string exactly once, at load
//! time; joins and lookups only ever compare strings.

use serde_json::Value;

/// Coerces a raw JSON value into a canonical string id.
///
/// Integers format without a fractional part; non-integral numbers keep their
/// JSON rendering. Blank strings and non-scalar values yield `None`.
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                Some(n.to_string())
            }
        }
        _ => None,
    }
}

/// Canonical form for an id that is already a string.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_ids_are_trimmed() {
        assert_eq!(id_from_value(&json!(" 31000 ")), Some("31000".to_string()));
        assert_eq!(id_from_value(&json!("abc-7")), Some("abc-7".to_string()));
    }

    #[test]
    fn numeric_ids_format_without_fraction() {
        assert_eq!(id_from_value(&json!(31000)), Some("31000".to_string()));
        assert_eq!(id_from_value(&json!(31000u64)), Some("31000".to_string()));
    }

    #[test]
    fn numeric_and_string_forms_agree() {
        assert_eq!(id_from_value(&json!(5185)), id_from_value(&json!("5185")));
    }

    #[test]
    fn blank_and_non_scalar_values_are_rejected() {
        assert_eq!(id_from_value(&json!("   ")), None);
        assert_eq!(id_from_value(&json!(null)), None);
        assert_eq!(id_from_value(&json!(["31000"])), None);
    }

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(normalize_id("  5185\n"), "5185");
    }
}
