pub mod dataset;
pub mod ids;
pub mod logging;
pub mod run_id;
pub mod schema;
pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// Commonly used data models shared across stores, dataset building and scoring.

/// A job opening with a free-text skill/behavior profile.
///
/// Profile sub-fields vary per requisition (the upstream schema is not fixed),
/// so they are kept as a key → text map discovered at load time. See
/// [`schema`] for the discovery rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requisition {
    pub code: String,
    pub title: String,
    pub client: String,
    pub profile_fields: BTreeMap<String, String>,
}

impl Requisition {
    /// All profile text joined into one document, in stable key order.
    pub fn profile_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.profile_fields.len());
        for value in self.profile_fields.values() {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
        parts.join(" ")
    }
}

/// Historical association between a candidate and a requisition, with its
/// terminal recruiting status. `status == None` means the upstream record
/// carried no status at all; the sentinel `"N/A"` is preserved as-is and
/// filtered later by the label builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProspectOutcome {
    pub requisition_code: String,
    pub candidate_code: String,
    pub status: Option<String>,
}

/// One candidate profile from the line-delimited store.
///
/// Every text field defaults to the empty string when the source record lacks
/// it; lookups must never fail on a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub candidate_code: String,
    pub full_name: Option<String>,
    pub professional_summary: String,
    pub knowledge: String,
    pub practice_area: String,
    pub professional_level: String,
    pub education: String,
    pub english_level: String,
    pub cv_pt: String,
    pub cv_en: String,
}

impl CandidateRecord {
    /// Concatenation of all free-text fields used for matching.
    pub fn full_text(&self) -> String {
        let parts = [
            self.professional_summary.as_str(),
            self.knowledge.as_str(),
            self.practice_area.as_str(),
            self.professional_level.as_str(),
            self.education.as_str(),
            self.english_level.as_str(),
            self.cv_pt.as_str(),
            self.cv_en.as_str(),
        ];

        let mut joined = String::new();
        for part in parts {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(trimmed);
        }
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_text_joins_fields_in_key_order() {
        let mut requisition = Requisition {
            code: "5185".into(),
            title: "Desenvolvedor Python".into(),
            client: "Morris".into(),
            ..Requisition::default()
        };
        requisition
            .profile_fields
            .insert("competencia_tecnicas_e_comportamentais".into(), "Python, SQL".into());
        requisition
            .profile_fields
            .insert("demais_observacoes".into(), "Inglês avançado".into());

        assert_eq!(requisition.profile_text(), "Python, SQL Inglês avançado");
    }

    #[test]
    fn profile_text_skips_blank_fields() {
        let mut requisition = Requisition::default();
        requisition.profile_fields.insert("a".into(), "  ".into());
        requisition.profile_fields.insert("b".into(), "texto".into());

        assert_eq!(requisition.profile_text(), "texto");
    }

    #[test]
    fn candidate_full_text_tolerates_missing_fields() {
        let record = CandidateRecord {
            candidate_code: "31000".into(),
            knowledge: "Java, Spring".into(),
            cv_pt: "Desenvolvedor backend".into(),
            ..CandidateRecord::default()
        };

        assert_eq!(record.full_text(), "Java, Spring Desenvolvedor backend");
    }

    #[test]
    fn empty_candidate_yields_empty_text() {
        assert_eq!(CandidateRecord::default().full_text(), "");
    }
}
