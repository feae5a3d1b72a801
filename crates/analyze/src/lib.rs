//! Tagrule validator -- checks a parsed rule before it is put in service.
//!
//! Validation runs in two stages:
//! 1. input-independent clause checks (see [`classify`]): an always-true
//!    clause before the last one makes the rest unreachable, and an
//!    always-false clause is reported as a warning;
//! 2. a check against sample inputs (see [`reachability`]): a guarded rule
//!    needs a condition that holds, a simple rule must evaluate.
//!
//! Validation never fails; every outcome is a [`ValidationReport`].

pub mod classify;
pub mod reachability;
pub mod report;

use tagrule_core::RuleForm;
use tagrule_eval::TagInputs;
use tracing::debug;

pub use classify::{check_clauses, classify, ClauseFindings, ConditionClass};
pub use reachability::{any_condition_true, check_sample};
pub use report::ValidationReport;

/// Validate a rule against one input snapshot.
pub fn validate(form: &RuleForm, inputs: &TagInputs) -> ValidationReport {
    let findings = check_clauses(form.clauses());
    if let Some(message) = findings.unreachable {
        return failed(form, message, findings.warnings);
    }
    match check_sample(form, inputs) {
        Ok(()) => passed(form, findings.warnings),
        Err(message) => failed(form, message, findings.warnings),
    }
}

/// Validate a rule against several input snapshots. The clause checks run
/// once; the first sample the rule fails on is named in the message.
pub fn validate_samples(form: &RuleForm, samples: &[TagInputs]) -> ValidationReport {
    let findings = check_clauses(form.clauses());
    if let Some(message) = findings.unreachable {
        return failed(form, message, findings.warnings);
    }
    for (index, sample) in samples.iter().enumerate() {
        if let Err(message) = check_sample(form, sample) {
            return failed(
                form,
                format!("sample {}: {}", index + 1, message),
                findings.warnings,
            );
        }
    }
    passed(form, findings.warnings)
}

fn passed(form: &RuleForm, warnings: Vec<String>) -> ValidationReport {
    debug!(kind = form.kind(), warnings = warnings.len(), "rule validated");
    ValidationReport::passed(warnings)
}

fn failed(form: &RuleForm, message: String, warnings: Vec<String>) -> ValidationReport {
    debug!(kind = form.kind(), %message, "rule failed validation");
    ValidationReport::failed(message, warnings)
}
