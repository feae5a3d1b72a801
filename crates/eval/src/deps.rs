//! Input dependency extraction.

use std::collections::BTreeSet;

use tagrule_core::{RuleForm, TagId};

/// Every tag id the rule reads, across the simple expression or all clause
/// conditions. Clause results are literals and never contribute.
pub fn input_tag_ids(form: &RuleForm) -> BTreeSet<TagId> {
    let mut ids = BTreeSet::new();
    for expr in form.expressions() {
        expr.collect_tag_ids(&mut ids);
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagrule_core::parse;

    fn ids(text: &str) -> Vec<TagId> {
        input_tag_ids(&parse(text).unwrap()).into_iter().collect()
    }

    #[test]
    fn simple_expression() {
        assert_eq!(ids("(#1 + #2) > #3"), vec![1, 2, 3]);
    }

    #[test]
    fn clause_conditions_are_merged() {
        assert_eq!(ids("(#5 > #2)[1],(#2 = $INVALID)[2],true[0]"), vec![2, 5]);
    }

    #[test]
    fn constant_rule_has_no_inputs() {
        assert!(ids("1 + 2").is_empty());
    }
}
