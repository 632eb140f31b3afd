//! Prospect outcome store: a JSON document keyed by requisition code, each
//! value holding the list of historical candidate associations for that
//! requisition and their terminal status.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::ids::{id_from_value, normalize_id};
use crate::ProspectOutcome;

#[derive(Debug, thiserror::Error)]
pub enum ProspectStoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("prospect document must be a JSON object keyed by requisition code")]
    NotAnObject,
}

/// Read-only prospect collection grouped by requisition code.
#[derive(Debug, Clone, Default)]
pub struct ProspectStore {
    by_requisition: BTreeMap<String, Vec<ProspectOutcome>>,
    total: usize,
}

// The status key drifted across upstream revisions; accept every known
// spelling, first non-blank wins.
const STATUS_KEYS: [&str; 3] = ["situacao_candidado", "situacao_candidato", "feedback"];

fn status_from_entry(entry: &Value) -> Option<String> {
    for key in STATUS_KEYS {
        if let Some(Value::String(s)) = entry.get(key) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

impl ProspectStore {
    pub fn load(path: &Path) -> Result<Self, ProspectStoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ProspectStoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: Value =
            serde_json::from_str(&raw).map_err(|source| ProspectStoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_value(&doc)
    }

    pub fn from_value(doc: &Value) -> Result<Self, ProspectStoreError> {
        let Value::Object(entries) = doc else {
            return Err(ProspectStoreError::NotAnObject);
        };

        let mut by_requisition: BTreeMap<String, Vec<ProspectOutcome>> = BTreeMap::new();
        let mut total = 0usize;

        for (code, data) in entries {
            let requisition_code = normalize_id(code);
            let Some(Value::Array(prospects)) = data.get("prospects") else {
                continue;
            };

            let outcomes = by_requisition.entry(requisition_code.clone()).or_default();
            for entry in prospects {
                let Some(candidate_code) = entry.get("codigo").and_then(id_from_value) else {
                    warn!(
                        requisition = requisition_code.as_str(),
                        "prospect without candidate code skipped"
                    );
                    continue;
                };

                outcomes.push(ProspectOutcome {
                    requisition_code: requisition_code.clone(),
                    candidate_code,
                    status: status_from_entry(entry),
                });
                total += 1;
            }
        }

        Ok(Self {
            by_requisition,
            total,
        })
    }

    /// Outcomes recorded for one requisition; empty slice when none exist.
    pub fn for_requisition(&self, code: &str) -> &[ProspectOutcome] {
        self.by_requisition
            .get(code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every outcome across all requisitions, in requisition-code order.
    pub fn all_outcomes(&self) -> impl Iterator<Item = &ProspectOutcome> {
        self.by_requisition.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_outcomes_with_mixed_id_types_and_status_keys() {
        let doc = json!({
            "5185": { "prospects": [
                { "codigo": 31000, "situacao_candidado": "Contratado pela Decision" },
                { "codigo": "31001", "feedback": "Reprovado" },
                { "codigo": "31002" }
            ]},
            "5186": { "prospects": [] }
        });

        let store = ProspectStore::from_value(&doc).unwrap();
        assert_eq!(store.len(), 3);

        let outcomes = store.for_requisition("5185");
        assert_eq!(outcomes[0].candidate_code, "31000");
        assert_eq!(
            outcomes[0].status.as_deref(),
            Some("Contratado pela Decision")
        );
        assert_eq!(outcomes[1].status.as_deref(), Some("Reprovado"));
        assert_eq!(outcomes[2].status, None);
    }

    #[test]
    fn unknown_requisition_yields_empty_slice() {
        let store = ProspectStore::from_value(&json!({})).unwrap();
        assert!(store.for_requisition("nope").is_empty());
    }

    #[test]
    fn prospects_without_candidate_code_are_skipped() {
        let doc = json!({
            "5185": { "prospects": [
                { "situacao_candidado": "Contratado" },
                { "codigo": "31000", "situacao_candidado": "Contratado" }
            ]}
        });

        let store = ProspectStore::from_value(&doc).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn blank_status_reads_as_unset() {
        let doc = json!({
            "5185": { "prospects": [ { "codigo": "1", "situacao_candidado": "  " } ] }
        });

        let store = ProspectStore::from_value(&doc).unwrap();
        assert_eq!(store.for_requisition("5185")[0].status, None);
    }

    #[test]
    fn duplicate_pairs_are_preserved() {
        let doc = json!({
            "5185": { "prospects": [
                { "codigo": "1", "situacao_candidado": "Em avaliação" },
                { "codigo": "1", "situacao_candidado": "Contratado" }
            ]}
        });

        let store = ProspectStore::from_value(&doc).unwrap();
        assert_eq!(store.for_requisition("5185").len(), 2);
    }
}
