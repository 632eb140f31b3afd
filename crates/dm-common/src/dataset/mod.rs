//! Training-set construction: denormalizes the three stores into rows and
//! derives the supervised features/labels.

pub mod join;
pub mod labels;

pub use join::{build_training_table, candidate_codes};
pub use labels::{label_training_rows, DatasetError, LabelRules, LabeledRow, TrainingTable};

/// One prospect outcome joined with its requisition and candidate profile.
///
/// Join misses on either side keep the row with empty text so the row count
/// stays stable for auditing.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub requisition_code: String,
    pub candidate_code: String,
    pub status: Option<String>,
    pub requisition_text: String,
    pub candidate_text: String,
}

impl TrainingRow {
    /// The unit of text classification: requisition profile text followed by
    /// the candidate text.
    pub fn document_text(&self) -> String {
        match (
            self.requisition_text.is_empty(),
            self.candidate_text.is_empty(),
        ) {
            (false, false) => format!("{} {}", self.requisition_text, self.candidate_text),
            (false, true) => self.requisition_text.clone(),
            (true, false) => self.candidate_text.clone(),
            (true, true) => String::new(),
        }
    }
}
