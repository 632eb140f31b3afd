//! Requisition store: a JSON document keyed by requisition code.
//!
//! Each value carries nested `informacoes_basicas` (title, client) and a
//! `perfil_vaga` object whose key set varies per record; profile sub-fields
//! are discovered dynamically (see [`crate::schema`]).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::ids::normalize_id;
use crate::schema::{collect_profile_fields, text_or_empty};
use crate::Requisition;

#[derive(Debug, thiserror::Error)]
pub enum RequisitionStoreError {
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
    #[error("requisition document must be a JSON object keyed by code")]
    NotAnObject,
}

/// Read-only requisition collection, loaded once per process.
#[derive(Debug, Clone, Default)]
pub struct RequisitionStore {
    by_code: BTreeMap<String, Requisition>,
}

impl RequisitionStore {
    pub fn load(path: &Path) -> Result<Self, RequisitionStoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RequisitionStoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: Value =
            serde_json::from_str(&raw).map_err(|source| RequisitionStoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_value(&doc)
    }

    pub fn from_value(doc: &Value) -> Result<Self, RequisitionStoreError> {
        let Value::Object(entries) = doc else {
            return Err(RequisitionStoreError::NotAnObject);
        };

        let mut by_code = BTreeMap::new();
        for (code, data) in entries {
            let code = normalize_id(code);
            if code.is_empty() {
                warn!("requisition with blank code skipped");
                continue;
            }

            let basic = data.get("informacoes_basicas");
            let requisition = Requisition {
                code: code.clone(),
                title: text_or_empty(basic.and_then(|b| b.get("titulo_vaga"))),
                client: text_or_empty(basic.and_then(|b| b.get("cliente"))),
                profile_fields: data
                    .get("perfil_vaga")
                    .map(collect_profile_fields)
                    .unwrap_or_default(),
            };
            by_code.insert(code, requisition);
        }

        Ok(Self { by_code })
    }

    pub fn get(&self, code: &str) -> Option<&Requisition> {
        self.by_code.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requisition> {
        self.by_code.values()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Case-insensitive substring search over title, client and code.
    /// A blank term returns everything, in code order.
    pub fn search(&self, term: &str) -> Vec<&Requisition> {
        let needle = term.trim().to_lowercase();
        self.by_code
            .values()
            .filter(|req| {
                needle.is_empty()
                    || req.title.to_lowercase().contains(&needle)
                    || req.client.to_lowercase().contains(&needle)
                    || req.code.contains(&needle)
            })
            .collect()
    }
}
