//! Candidate store: one JSON object per line, queried by id set.
//!
//! The collection is large (tens of thousands of records), so lookups stream
//! the file line by line and keep only the requested ids in memory. Ids
//! absent from the store are simply absent from the result.

use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::ids::{id_from_value, normalize_id};
use crate::schema::text_or_empty;
use crate::CandidateRecord;

#[derive(Debug, thiserror::Error)]
pub enum CandidateStoreError {
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
    #[error("applicants document must be a JSON object keyed by candidate code")]
    NotAnObject,
}

/// Handle over the line-delimited candidate file. Cheap to clone; no record
/// is held in memory between lookups.
#[derive(Debug, Clone)]
pub struct CandidateStore {
    path: PathBuf,
}

impl CandidateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetches the records for `ids`, streaming the store file.
    ///
    /// Lines are pre-filtered by raw substring before JSON parsing (the id
    /// always appears verbatim in its own record), then matched exactly on
    /// the normalized candidate code. Malformed lines are skipped with a
    /// warning. The scan stops as soon as every requested id was found.
    pub fn fetch_candidates(
        &self,
        ids: &HashSet<String>,
    ) -> Result<HashMap<String, CandidateRecord>, CandidateStoreError> {
        let mut found: HashMap<String, CandidateRecord> = HashMap::with_capacity(ids.len());
        if ids.is_empty() {
            return Ok(found);
        }

        let file = std::fs::File::open(&self.path).map_err(|source| CandidateStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let reader = BufReader::new(file);

        let mut malformed = 0usize;
        for line in reader.lines() {
            let line = line.map_err(|source| CandidateStoreError::Io {
                path: self.path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            if !ids.iter().any(|id| line.contains(id.as_str())) {
                continue;
            }

            let value: Value = match serde_json::from_str(&line) {
                Ok(value) => value,
                Err(err) => {
                    malformed += 1;
                    warn!(error = %err, "malformed candidate line skipped");
                    continue;
                }
            };

            let Some(record) = record_from_value(&value) else {
                malformed += 1;
                warn!("candidate line without a code skipped");
                continue;
            };

            if ids.contains(&record.candidate_code) {
                found.insert(record.candidate_code.clone(), record);
                if found.len() == ids.len() {
                    break;
                }
            }
        }

        debug!(
            requested = ids.len(),
            found = found.len(),
            malformed,
            "candidate fetch finished"
        );
        Ok(found)
    }
}

fn record_from_value(value: &Value) -> Option<CandidateRecord> {
    let candidate_code = value.get("codigo_candidato").and_then(id_from_value)?;

    let personal = value.get("informacoes_pessoais");
    let professional = value.get("informacoes_profissionais");
    let education = value.get("formacao_e_idiomas");

    let full_name = text_or_empty(personal.and_then(|p| p.get("nome_completo")));

    Some(CandidateRecord {
        candidate_code,
        full_name: if full_name.is_empty() {
            None
        } else {
            Some(full_name)
        },
        professional_summary: text_or_empty(
            professional.and_then(|p| p.get("resumo_profissional")),
        ),
        knowledge: text_or_empty(professional.and_then(|p| p.get("conhecimentos"))),
        practice_area: text_or_empty(professional.and_then(|p| p.get("area_de_atuacao"))),
        professional_level: text_or_empty(professional.and_then(|p| p.get("nivel_profissional"))),
        education: text_or_empty(education.and_then(|e| e.get("formacao"))),
        english_level: text_or_empty(education.and_then(|e| e.get("nivel_ingles"))),
        cv_pt: text_or_empty(value.get("cv_pt")),
        cv_en: text_or_empty(value.get("cv_en")),
    })
}

/// One-time conversion of the raw keyed applicants document into the
/// line-delimited store, injecting each key as `codigo_candidato`.
/// Returns the number of records written.
pub fn convert_keyed_document(
    raw_path: &Path,
    ndjson_path: &Path,
) -> Result<usize, CandidateStoreError> {
    let raw = std::fs::read_to_string(raw_path).map_err(|source| CandidateStoreError::Io {
        path: raw_path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&raw).map_err(|source| CandidateStoreError::Parse {
        path: raw_path.to_path_buf(),
        source,
    })?;
    let Value::Object(entries) = doc else {
        return Err(CandidateStoreError::NotAnObject);
    };

    let file = std::fs::File::create(ndjson_path).map_err(|source| CandidateStoreError::Io {
        path: ndjson_path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let mut written = 0usize;
    for (code, mut record) in entries {
        if let Value::Object(ref mut map) = record {
            map.insert(
                "codigo_candidato".to_string(),
                Value::String(normalize_id(&code)),
            );
        } else {
            warn!(code = code.as_str(), "non-object applicant entry skipped");
            continue;
        }

        let line =
            serde_json::to_string(&record).map_err(|source| CandidateStoreError::Parse {
                path: ndjson_path.to_path_buf(),
                source,
            })?;
        writeln!(writer, "{line}").map_err(|source| CandidateStoreError::Io {
            path: ndjson_path.to_path_buf(),
            source,
        })?;
        written += 1;
    }

    writer.flush().map_err(|source| CandidateStoreError::Io {
        path: ndjson_path.to_path_buf(),
        source,
    })?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn store_with_lines(lines: &[&str]) -> (tempfile::TempDir, CandidateStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applicants.nd.json");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        (dir, CandidateStore::new(path))
    }

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn fetches_only_requested_ids() {
        let (_dir, store) = store_with_lines(&[
            r#"{"codigo_candidato":"31000","informacoes_profissionais":{"conhecimentos":"Python"},"cv_pt":"cv um"}"#,
            r#"{"codigo_candidato":"31001","informacoes_profissionais":{"conhecimentos":"Java"},"cv_pt":"cv dois"}"#,
            r#"{"codigo_candidato":"31002","informacoes_profissionais":{"conhecimentos":"SQL"},"cv_pt":"cv três"}"#,
        ]);

        let result = store.fetch_candidates(&ids(&["31000", "31002"])).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("31000").unwrap().knowledge, "Python");
        assert_eq!(result.get("31002").unwrap().cv_pt, "cv três");
        assert!(!result.contains_key("31001"));
    }

    #[test]
    fn missing_ids_are_absent_not_errors() {
        let (_dir, store) =
            store_with_lines(&[r#"{"codigo_candidato":"31000","cv_pt":"texto"}"#]);

        let result = store
            .fetch_candidates(&ids(&["31000", "99999"]))
            .unwrap();
        assert_eq!(result.len(), 1);
        assert!(!result.contains_key("99999"));
    }

    #[test]
    fn numeric_codes_match_string_ids() {
        let (_dir, store) =
            store_with_lines(&[r#"{"codigo_candidato":31000,"cv_pt":"numérico"}"#]);

        let result = store.fetch_candidates(&ids(&["31000"])).unwrap();
        assert_eq!(result.get("31000").unwrap().cv_pt, "numérico");
    }

    #[test]
    fn missing_subfields_read_as_empty() {
        let (_dir, store) = store_with_lines(&[r#"{"codigo_candidato":"31000"}"#]);

        let record = store
            .fetch_candidates(&ids(&["31000"]))
            .unwrap()
            .remove("31000")
            .unwrap();
        assert_eq!(record.full_name, None);
        assert_eq!(record.professional_summary, "");
        assert_eq!(record.full_text(), "");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let (_dir, store) = store_with_lines(&[
            "31000 este não é json",
            r#"{"codigo_candidato":"31000","cv_pt":"válido"}"#,
        ]);

        let result = store.fetch_candidates(&ids(&["31000"])).unwrap();
        assert_eq!(result.get("31000").unwrap().cv_pt, "válido");
    }

    #[test]
    fn empty_id_set_short_circuits() {
        let store = CandidateStore::new("/definitely/not/a/file");
        let result = store.fetch_candidates(&HashSet::new()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn converts_keyed_document_to_lines() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("applicants.raw.json");
        let ndjson_path = dir.path().join("applicants.nd.json");
        std::fs::write(
            &raw_path,
            r#"{"31000":{"cv_pt":"um"},"31001":{"cv_pt":"dois"}}"#,
        )
        .unwrap();

        let written = convert_keyed_document(&raw_path, &ndjson_path).unwrap();
        assert_eq!(written, 2);

        let store = CandidateStore::new(&ndjson_path);
        let result = store.fetch_candidates(&ids(&["31001"])).unwrap();
        assert_eq!(result.get("31001").unwrap().cv_pt, "dois");
    }
}
