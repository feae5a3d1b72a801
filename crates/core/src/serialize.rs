//! Canonical rule text.
//!
//! Every binary node is parenthesised, so re-parsing the output rebuilds the
//! same tree regardless of precedence. Guarded clauses are joined with `,`
//! and multi-return clauses with `|`, which keeps the dialect on re-parse.

use std::fmt;

use crate::ast::{Clause, Expression, RuleForm, Value};
use crate::parser::is_bare_result;

/// Plain rendering of a value: numbers and booleans as written, strings
/// without quotes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Value::Str(s)) => write!(f, "\"{}\"", s),
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::TagRef(id) => write!(f, "#{}", id),
            Expression::InvalidMarker => f.write_str("$INVALID"),
            Expression::Unary { op, operand } => write!(f, "{}{}", op.symbol(), operand),
            Expression::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Value::Str(s) if !is_bare_result(s) => write!(f, "{}[\"{}\"]", self.condition, s),
            result => write!(f, "{}[{}]", self.condition, result),
        }
    }
}

impl fmt::Display for RuleForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleForm::Simple(expr) => write!(f, "{}", expr),
            RuleForm::Guarded(clauses) => write_clauses(f, clauses, ","),
            RuleForm::MultiReturn(clauses) => write_clauses(f, clauses, "|"),
        }
    }
}

fn write_clauses(f: &mut fmt::Formatter<'_>, clauses: &[Clause], separator: &str) -> fmt::Result {
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", clause)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    fn canonical(text: &str) -> String {
        parse(text).unwrap().to_string()
    }

    #[test]
    fn binary_nodes_are_parenthesised() {
        assert_eq!(canonical("#1 + #2 * 3 > 4"), "((#1 + (#2 * 3)) > 4)");
    }

    #[test]
    fn double_operators_print_in_single_form() {
        assert_eq!(canonical("#1 && #2 || #3"), "((#1 & #2) | #3)");
    }

    #[test]
    fn unary_and_keywords() {
        assert_eq!(canonical("!(#1 = $invalid)"), "!(#1 = $INVALID)");
        assert_eq!(canonical("-#2 ^ 2"), "(-#2 ^ 2)");
    }

    #[test]
    fn literals() {
        assert_eq!(canonical("#1 = \"on\""), "(#1 = \"on\")");
        assert_eq!(canonical("2.50 + TRUE"), "(2.5 + true)");
    }

    #[test]
    fn guarded_clauses() {
        assert_eq!(
            canonical("(#1 < 10)[1], true[0]"),
            "(#1 < 10)[1],true[0]"
        );
    }

    #[test]
    fn multi_return_clauses_use_pipes() {
        assert_eq!(
            canonical("(#1 = 1) | (#1 = 2)[LOW],true[HIGH]"),
            "(#1 = 1)[LOW]|(#1 = 2)[LOW]|true[HIGH]"
        );
    }

    #[test]
    fn results_that_would_change_meaning_are_quoted() {
        assert_eq!(canonical("true[\"42\"]"), "true[\"42\"]");
        assert_eq!(canonical("true[\"TRUE\"]"), "true[\"TRUE\"]");
        assert_eq!(canonical("true[high level]"), "true[high level]");
    }
}
