//! Left join from prospect outcomes to requisitions and candidate profiles.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::store::RequisitionStore;
use crate::{CandidateRecord, ProspectOutcome};

use super::TrainingRow;

/// The candidate codes referenced by a set of outcomes, for scoping the
/// candidate-store fetch to exactly what the join needs.
pub fn candidate_codes<'a>(
    outcomes: impl IntoIterator<Item = &'a ProspectOutcome>,
) -> HashSet<String> {
    outcomes
        .into_iter()
        .map(|outcome| outcome.candidate_code.clone())
        .collect()
}

/// Builds the denormalized training table.
///
/// One row per outcome, in input order. Duplicate (requisition, candidate)
/// pairs are preserved: they represent historically distinct records. A
/// missing candidate or requisition keeps the row with empty text on that
/// side; dropping it would corrupt downstream row counts.
pub fn build_training_table<'a>(
    requisitions: &RequisitionStore,
    outcomes: impl IntoIterator<Item = &'a ProspectOutcome>,
    candidates: &HashMap<String, CandidateRecord>,
) -> Vec<TrainingRow> {
    let mut rows = Vec::new();

    for outcome in outcomes {
        let requisition_text = match requisitions.get(&outcome.requisition_code) {
            Some(requisition) => requisition.profile_text(),
            None => {
                debug!(
                    requisition = outcome.requisition_code.as_str(),
                    "outcome references unknown requisition; keeping row with empty profile text"
                );
                String::new()
            }
        };

        let candidate_text = match candidates.get(&outcome.candidate_code) {
            Some(record) => record.full_text(),
            None => {
                debug!(
                    candidate = outcome.candidate_code.as_str(),
                    "outcome references unknown candidate; keeping row with empty candidate text"
                );
                String::new()
            }
        };

        rows.push(TrainingRow {
            requisition_code: outcome.requisition_code.clone(),
            candidate_code: outcome.candidate_code.clone(),
            status: outcome.status.clone(),
            requisition_text,
            candidate_text,
        });
    }

    rows
}
