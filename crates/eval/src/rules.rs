//! Rule-level evaluation: simple expressions and ordered clause selection.
//!
//! Clauses are tried in declared order. The first condition that is true
//! supplies the result; an error in any condition before that ends the
//! evaluation.

use tracing::trace;

use tagrule_core::{Clause, RuleForm, Value};

use crate::predicate::{eval_condition, eval_value, EvalContext, Mode};
use crate::types::{EvalError, TagInputs};

/// Index of the first clause whose condition is true.
pub fn select_clause(
    clauses: &[Clause],
    inputs: &TagInputs,
    mode: Mode,
) -> Result<usize, EvalError> {
    for (index, clause) in clauses.iter().enumerate() {
        let matched = eval_condition(&clause.condition, inputs, mode)?;
        trace!(clause = index, matched, "evaluated clause condition");
        if matched {
            return Ok(index);
        }
    }
    Err(EvalError::NoClauseMatched)
}

/// Evaluate a parsed rule in the given mode.
pub fn eval_form(form: &RuleForm, inputs: &TagInputs, mode: Mode) -> Result<Value, EvalError> {
    match form {
        RuleForm::Simple(expr) => {
            let ctx = EvalContext::for_expression(expr, inputs, mode);
            eval_value(expr, &ctx)
        }
        RuleForm::Guarded(clauses) | RuleForm::MultiReturn(clauses) => {
            let index = select_clause(clauses, inputs, mode)?;
            Ok(clauses[index].result.clone())
        }
    }
}

/// Strict evaluation: every failure is reported.
pub fn evaluate(form: &RuleForm, inputs: &TagInputs) -> Result<Value, EvalError> {
    eval_form(form, inputs, Mode::Strict)
}

/// Best-effort evaluation. Missing and invalid tags are tolerated as far
/// as the rule allows; any remaining failure yields `None`.
pub fn force_evaluate(form: &RuleForm, inputs: &TagInputs) -> Option<Value> {
    match eval_form(form, inputs, Mode::Force) {
        Ok(value) => Some(value),
        Err(e) => {
            trace!(error = %e, "force evaluation produced no value");
            None
        }
    }
}
