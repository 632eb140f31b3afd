//! Free-text field discovery for loosely-schemed source documents.
//!
//! The requisition profile object does not have a fixed key set: different
//! document revisions carry different sub-fields. Instead of a hardcoded
//! column list, profile keys are discovered at load time and validated
//! against an allow-list pattern, so newly introduced text fields flow into
//! the training document without a code change while junk keys are dropped
//! loudly.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// Keys must look like snake_case identifiers. Anything else (spaces,
/// punctuation, leading digits) is rejected and logged.
static PROFILE_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// Scalar-to-text accessor with a documented default: missing values, nulls
/// and non-scalar values all read as the empty string.
pub fn text_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Flattens a profile object into `key → text`, recursing into nested objects
/// with `_`-joined keys (`formacao.idiomas` → `formacao_idiomas`).
///
/// Arrays and keys failing the allow-list pattern are skipped with a warning;
/// scalar values are coerced via [`text_or_empty`]. Blank leaves are dropped.
pub fn collect_profile_fields(profile: &Value) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let Value::Object(map) = profile else {
        if !profile.is_null() {
            warn!(kind = json_kind(profile), "profile is not an object; ignoring");
        }
        return fields;
    };

    collect_into(map, None, &mut fields);
    fields
}

fn collect_into(
    map: &serde_json::Map<String, Value>,
    prefix: Option<&str>,
    out: &mut BTreeMap<String, String>,
) {
    for (key, value) in map {
        if !PROFILE_KEY_RE.is_match(key) {
            warn!(key, "profile key rejected by allow-list pattern");
            continue;
        }

        let full_key = match prefix {
            Some(p) => format!("{p}_{key}"),
            None => key.clone(),
        };

        match value {
            Value::Object(nested) => collect_into(nested, Some(&full_key), out),
            Value::Array(_) => {
                warn!(key = full_key.as_str(), "array-valued profile field skipped");
            }
            other => {
                let text = text_or_empty(Some(other));
                if !text.is_empty() {
                    out.insert(full_key, text);
                }
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_or_empty_defaults_missing_to_empty() {
        assert_eq!(text_or_empty(None), "");
        assert_eq!(text_or_empty(Some(&Value::Null)), "");
        assert_eq!(text_or_empty(Some(&json!("  abc "))), "abc");
        assert_eq!(text_or_empty(Some(&json!(7))), "7");
    }

    #[test]
    fn collects_flat_and_nested_text_fields() {
        let profile = json!({
            "competencia_tecnicas_e_comportamentais": "Python, SQL",
            "nivel_academico": "Superior completo",
            "idiomas": { "nivel_ingles": "Avançado" }
        });

        let fields = collect_profile_fields(&profile);
        assert_eq!(
            fields.get("competencia_tecnicas_e_comportamentais").unwrap(),
            "Python, SQL"
        );
        assert_eq!(fields.get("idiomas_nivel_ingles").unwrap(), "Avançado");
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn newly_introduced_keys_flow_through() {
        let fields = collect_profile_fields(&json!({ "habilidades_desejadas": "Docker" }));
        assert_eq!(fields.get("habilidades_desejadas").unwrap(), "Docker");
    }

    #[test]
    fn rejects_keys_outside_allow_list_pattern() {
        let profile = json!({
            "Competências!": "dropped",
            "9starts_with_digit": "dropped",
            "valid_key": "kept"
        });

        let fields = collect_profile_fields(&profile);
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("valid_key"));
    }

    #[test]
    fn blank_leaves_and_arrays_are_dropped() {
        let profile = json!({
            "vazio": "   ",
            "lista": ["a", "b"],
            "texto": "ok"
        });

        let fields = collect_profile_fields(&profile);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("texto").unwrap(), "ok");
    }
}
