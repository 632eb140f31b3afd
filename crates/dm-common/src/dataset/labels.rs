//! Label derivation and training-table filtering.
//!
//! The success-keyword set is a business rule that has drifted across
//! upstream revisions, so it is injected configuration, not a constant:
//! callers decide which outcome statuses count as success.

use serde::{Deserialize, Serialize};

use super::TrainingRow;

/// Default placeholder for outcomes that never reached a terminal status.
pub const DEFAULT_SENTINEL: &str = "N/A";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error(
        "training rows contain {distinct} distinct label value(s) after filtering; \
         both classes are required to fit"
    )]
    InsufficientLabelDiversity { distinct: usize },
}

/// Business rule mapping an outcome status to a binary success label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRules {
    success_keywords: Vec<String>,
    sentinel: String,
}

impl LabelRules {
    /// Builds the rule set from the configured success keywords. Keywords are
    /// lowercased once here; blank entries are dropped.
    pub fn new(keywords: impl IntoIterator<Item = String>) -> Self {
        let success_keywords = keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();

        Self {
            success_keywords,
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    pub fn success_keywords(&self) -> &[String] {
        &self.success_keywords
    }

    /// Whether a status carries any training signal. Unset statuses and the
    /// sentinel carry none and must not produce a training row.
    pub fn has_signal(&self, status: Option<&str>) -> bool {
        match status {
            Some(status) => {
                let trimmed = status.trim();
                !trimmed.is_empty() && trimmed != self.sentinel
            }
            None => false,
        }
    }

    /// Case-insensitive substring match against the success keywords.
    pub fn label_for(&self, status: &str) -> u8 {
        let lowered = status.to_lowercase();
        let success = self
            .success_keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()));
        u8::from(success)
    }
}

/// A training row with its derived document and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub requisition_code: String,
    pub candidate_code: String,
    pub document_text: String,
    pub label: u8,
}

/// The filtered, labeled table handed to the scoring pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingTable {
    pub rows: Vec<LabeledRow>,
}

impl TrainingTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.rows.iter().filter(|row| row.label == 1).count()
    }

    pub fn documents(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.document_text.clone()).collect()
    }

    pub fn labels(&self) -> Vec<u8> {
        self.rows.iter().map(|row| row.label).collect()
    }
}

/// Derives `document_text` and `label` for every row carrying signal.
///
/// Rows with an unset or sentinel status are excluded entirely. Fails with
/// [`DatasetError::InsufficientLabelDiversity`] when fewer than two distinct
/// label values remain; a single-class table would train a degenerate model.
pub fn label_training_rows(
    rows: &[TrainingRow],
    rules: &LabelRules,
) -> Result<TrainingTable, DatasetError> {
    let mut labeled = Vec::new();

    for row in rows {
        if !rules.has_signal(row.status.as_deref()) {
            continue;
        }
        let status = row.status.as_deref().unwrap_or_default();

        labeled.push(LabeledRow {
            requisition_code: row.requisition_code.clone(),
            candidate_code: row.candidate_code.clone(),
            document_text: row.document_text(),
            label: rules.label_for(status),
        });
    }

    let has_positive = labeled.iter().any(|row| row.label == 1);
    let has_negative = labeled.iter().any(|row| row.label == 0);
    if !(has_positive && has_negative) {
        let distinct = usize::from(has_positive) + usize::from(has_negative);
        return Err(DatasetError::InsufficientLabelDiversity { distinct });
    }

    Ok(TrainingTable { rows: labeled })
}
