//! Static classification of clause conditions.
//!
//! A condition that reads no tags and no `$INVALID` has one fixed value.
//! Classifying every condition up front finds clauses that can never be
//! reached and clauses that can never match, without any input data.

use serde::Serialize;
use tagrule_core::{Clause, Expression};
use tagrule_eval::{eval_condition, Mode, TagInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConditionClass {
    AlwaysTrue,
    AlwaysFalse,
    /// Depends on inputs, or cannot be evaluated to a `Bool` at all.
    Indeterminate,
}

/// Classify one condition.
pub fn classify(condition: &Expression) -> ConditionClass {
    if condition.references_inputs() {
        return ConditionClass::Indeterminate;
    }
    match eval_condition(condition, &TagInputs::new(), Mode::Strict) {
        Ok(true) => ConditionClass::AlwaysTrue,
        Ok(false) => ConditionClass::AlwaysFalse,
        Err(_) => ConditionClass::Indeterminate,
    }
}

/// Findings of the input-independent clause checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseFindings {
    /// Set when a clause other than the last is always true.
    pub unreachable: Option<String>,
    pub warnings: Vec<String>,
}

/// Check the clause list of a guarded rule. Clauses are numbered from 1 in
/// the messages.
pub fn check_clauses(clauses: &[Clause]) -> ClauseFindings {
    let mut findings = ClauseFindings::default();
    let last = clauses.len().saturating_sub(1);

    for (index, clause) in clauses.iter().enumerate() {
        match classify(&clause.condition) {
            ConditionClass::AlwaysTrue if index < last && findings.unreachable.is_none() => {
                findings.unreachable = Some(format!(
                    "clause {} is always true, so the clauses after it are an unreachable statement",
                    index + 1
                ));
            }
            ConditionClass::AlwaysFalse => findings.warnings.push(format!(
                "clause {} can never match: its condition is always false",
                index + 1
            )),
            _ => {}
        }
    }
    findings
}
