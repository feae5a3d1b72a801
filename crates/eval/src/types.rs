//! Runtime input and error types for the evaluator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tagrule_core::{TagId, Value};

// ──────────────────────────────────────────────
// Inputs
// ──────────────────────────────────────────────

/// Current value of one tag together with its quality flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagInput {
    pub value: Value,
    /// False when the tag's value should not be trusted.
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl TagInput {
    pub fn valid(value: impl Into<Value>) -> Self {
        TagInput {
            value: value.into(),
            valid: true,
        }
    }

    pub fn invalid(value: impl Into<Value>) -> Self {
        TagInput {
            value: value.into(),
            valid: false,
        }
    }
}

/// Snapshot of the tags a rule reads, keyed by tag id. Absent ids are
/// missing.
pub type TagInputs = BTreeMap<TagId, TagInput>;

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors that can occur while evaluating a rule against one input snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A referenced tag has no entry in the inputs.
    #[error("tag #{tag_id} has no current value")]
    MissingTag { tag_id: TagId },
    /// A referenced tag is marked invalid and the rule does not handle it.
    #[error("tag #{tag_id} holds an invalid value")]
    InvalidTag { tag_id: TagId },
    /// An operator received operands of the wrong kind.
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },
    #[error("division by zero")]
    DivisionByZero,
    /// No clause condition evaluated to true.
    #[error("no clause condition is true")]
    NoClauseMatched,
}

impl EvalError {
    pub(crate) fn mismatch(message: impl Into<String>) -> Self {
        EvalError::TypeMismatch {
            message: message.into(),
        }
    }
}
