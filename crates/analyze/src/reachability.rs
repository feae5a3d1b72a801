//! Input-dependent checks against one sample of tag values.

use tracing::debug;

use tagrule_core::{Clause, RuleForm};
use tagrule_eval::{eval_condition, evaluate, Mode, TagInputs};

/// True when at least one condition force-evaluates to `true`.
pub fn any_condition_true(clauses: &[Clause], inputs: &TagInputs) -> bool {
    clauses
        .iter()
        .any(|clause| eval_condition(&clause.condition, inputs, Mode::Force) == Ok(true))
}

/// Check that the rule yields a value for `inputs`. A simple expression must
/// evaluate strictly; a guarded rule needs at least one condition that holds.
pub fn check_sample(form: &RuleForm, inputs: &TagInputs) -> Result<(), String> {
    match form {
        RuleForm::Simple(_) => evaluate(form, inputs).map(|_| ()).map_err(|e| {
            debug!(error = %e, "simple rule failed on sample");
            e.to_string()
        }),
        RuleForm::Guarded(clauses) | RuleForm::MultiReturn(clauses) => {
            if any_condition_true(clauses, inputs) {
                Ok(())
            } else {
                debug!(clauses = clauses.len(), "no condition holds for sample");
                Err("none of the rule's conditions are true for the given inputs".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagrule_core::parse;
    use tagrule_eval::TagInput;

    #[test]
    fn missing_tags_do_not_count_as_true() {
        let form = parse("(#1 > 1)[A],(#2 = $INVALID)[B]").unwrap();
        assert!(any_condition_true(form.clauses(), &TagInputs::new()));

        let form = parse("(#1 > 1)[A]").unwrap();
        assert!(!any_condition_true(form.clauses(), &TagInputs::new()));
    }

    #[test]
    fn simple_rule_must_evaluate() {
        let form = parse("#1 + 1").unwrap();
        assert_eq!(
            check_sample(&form, &TagInputs::new()),
            Err("tag #1 has no current value".to_string())
        );
        let inputs = TagInputs::from([(1, TagInput::valid(2.0))]);
        assert_eq!(check_sample(&form, &inputs), Ok(()));
    }
}
