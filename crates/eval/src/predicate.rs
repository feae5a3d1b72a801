//! Expression tree evaluator.
//!
//! Walks an `Expression` against a `TagInputs` snapshot. Invalid tag
//! values are carried as an `Operand::Invalid` sentinel while they may
//! still meet `$INVALID` in an equality test; any other operator that
//! receives the sentinel turns it into an error.

use tagrule_core::{BinaryOp, Expression, TagId, UnaryOp, Value};

use crate::numeric;
use crate::types::{EvalError, TagInputs};

/// How tag quality problems are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Missing tags fail. Invalid tags fail unless the expression
    /// mentions `$INVALID`.
    Strict,
    /// Missing and invalid tags both become the sentinel.
    Force,
}

/// Intermediate result of evaluating a node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Value(Value),
    /// The invalid sentinel. `origin` is the tag it stands in for, or
    /// `None` for the `$INVALID` keyword itself.
    Invalid { origin: Option<TagId> },
}

impl Operand {
    /// Unwrap a concrete value; the sentinel is an error outside `=`/`!=`.
    pub(crate) fn into_value(self, context: &str) -> Result<Value, EvalError> {
        match self {
            Operand::Value(v) => Ok(v),
            Operand::Invalid {
                origin: Some(tag_id),
            } => Err(EvalError::InvalidTag { tag_id }),
            Operand::Invalid { origin: None } => Err(EvalError::mismatch(format!(
                "$INVALID can only be compared with '=' or '!=', not used in {}",
                context
            ))),
        }
    }
}

/// Evaluation context for one top-level expression.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub inputs: &'a TagInputs,
    pub mode: Mode,
    /// True when the top-level expression contains `$INVALID`, which lets
    /// strict mode carry invalid tags as the sentinel.
    pub invalid_aware: bool,
}

impl<'a> EvalContext<'a> {
    /// Context for evaluating `expr` as a whole.
    pub fn for_expression(expr: &Expression, inputs: &'a TagInputs, mode: Mode) -> Self {
        EvalContext {
            inputs,
            mode,
            invalid_aware: expr.uses_invalid_keyword(),
        }
    }
}

/// Evaluate `expr` to a concrete value.
pub fn eval_value(expr: &Expression, ctx: &EvalContext) -> Result<Value, EvalError> {
    eval_operand(expr, ctx)?.into_value("a rule result")
}

/// Evaluate a clause condition. Anything but a `Bool` is a type mismatch.
pub fn eval_condition(
    condition: &Expression,
    inputs: &TagInputs,
    mode: Mode,
) -> Result<bool, EvalError> {
    let ctx = EvalContext::for_expression(condition, inputs, mode);
    match eval_operand(condition, &ctx)?.into_value("a clause condition")? {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::mismatch(format!(
            "clause condition must be Bool, got {}",
            other.type_name()
        ))),
    }
}

pub(crate) fn eval_operand(expr: &Expression, ctx: &EvalContext) -> Result<Operand, EvalError> {
    match expr {
        Expression::Literal(value) => Ok(Operand::Value(value.clone())),

        Expression::InvalidMarker => Ok(Operand::Invalid { origin: None }),

        Expression::TagRef(id) => eval_tag(*id, ctx),

        Expression::Unary { op, operand } => {
            let value = eval_operand(operand, ctx)?.into_value(op_context(op.symbol()).as_str())?;
            match op {
                UnaryOp::Not => match value {
                    Value::Bool(b) => Ok(Operand::Value(Value::Bool(!b))),
                    other => Err(EvalError::mismatch(format!(
                        "operator '!' needs a Bool operand, got {}",
                        other.type_name()
                    ))),
                },
                UnaryOp::Negate => numeric::negate(&value).map(Operand::Value),
            }
        }

        Expression::Binary { op, left, right } => {
            // Both sides are always evaluated; the left error wins.
            let left = eval_operand(left, ctx);
            let right = eval_operand(right, ctx);
            let (left, right) = (left?, right?);
            eval_binary(*op, left, right).map(Operand::Value)
        }
    }
}

fn eval_tag(id: TagId, ctx: &EvalContext) -> Result<Operand, EvalError> {
    match (ctx.inputs.get(&id), ctx.mode) {
        (Some(input), _) if input.valid => Ok(Operand::Value(input.value.clone())),
        (Some(_), Mode::Strict) if ctx.invalid_aware => Ok(Operand::Invalid { origin: Some(id) }),
        (Some(_), Mode::Strict) => Err(EvalError::InvalidTag { tag_id: id }),
        (None, Mode::Strict) => Err(EvalError::MissingTag { tag_id: id }),
        (_, Mode::Force) => Ok(Operand::Invalid { origin: Some(id) }),
    }
}

fn op_context(symbol: &str) -> String {
    format!("operator '{}'", symbol)
}

fn eval_binary(op: BinaryOp, left: Operand, right: Operand) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Eq => operands_equal(op, &left, &right).map(Value::Bool),
        BinaryOp::Ne => operands_equal(op, &left, &right).map(|eq| Value::Bool(!eq)),
        _ => {
            let context = op_context(op.symbol());
            let left = left.into_value(&context)?;
            let right = right.into_value(&context)?;
            match op {
                BinaryOp::And | BinaryOp::Or => logical(op, &left, &right).map(Value::Bool),
                BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                    numeric::compare_numbers(op, &left, &right).map(Value::Bool)
                }
                _ => numeric::eval_arithmetic(op, &left, &right),
            }
        }
    }
}

/// `=` semantics: the sentinel equals only the sentinel; concrete values
/// must share a kind.
fn operands_equal(op: BinaryOp, left: &Operand, right: &Operand) -> Result<bool, EvalError> {
    match (left, right) {
        (Operand::Invalid { .. }, Operand::Invalid { .. }) => Ok(true),
        (Operand::Invalid { .. }, Operand::Value(_)) | (Operand::Value(_), Operand::Invalid { .. }) => {
            Ok(false)
        }
        (Operand::Value(l), Operand::Value(r)) => {
            if !l.same_kind(r) {
                return Err(EvalError::mismatch(format!(
                    "operator '{}' cannot compare {} with {}",
                    op.symbol(),
                    l.type_name(),
                    r.type_name()
                )));
            }
            Ok(l == r)
        }
    }
}

fn logical(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => Ok(if op == BinaryOp::And {
            *l && *r
        } else {
            *l || *r
        }),
        _ => Err(EvalError::mismatch(format!(
            "operator '{}' needs Bool operands, got {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagInput;
    use tagrule_core::{parse, RuleForm};

    fn expr(text: &str) -> Expression {
        match parse(text).unwrap() {
            RuleForm::Simple(e) => e,
            other => panic!("expected simple form, got {:?}", other),
        }
    }

    fn strict(text: &str, inputs: &TagInputs) -> Result<Value, EvalError> {
        let e = expr(text);
        eval_value(&e, &EvalContext::for_expression(&e, inputs, Mode::Strict))
    }

    fn inputs(entries: &[(TagId, TagInput)]) -> TagInputs {
        entries.iter().cloned().collect()
    }

    #[test]
    fn literals_and_tags() {
        let snapshot = inputs(&[(1, TagInput::valid(4.0)), (2, TagInput::valid("on"))]);
        assert_eq!(strict("#1 * 2 + 1", &snapshot), Ok(Value::Number(9.0)));
        assert_eq!(strict("#2 = \"on\"", &snapshot), Ok(Value::Bool(true)));
        assert_eq!(strict("#2", &snapshot), Ok(Value::from("on")));
    }

    #[test]
    fn missing_tag_in_strict_mode() {
        assert_eq!(
            strict("#5 + 1", &TagInputs::new()),
            Err(EvalError::MissingTag { tag_id: 5 })
        );
    }

    #[test]
    fn invalid_tag_without_keyword_fails() {
        let snapshot = inputs(&[(1, TagInput::invalid(20.0))]);
        assert_eq!(
            strict("#1 > 10", &snapshot),
            Err(EvalError::InvalidTag { tag_id: 1 })
        );
    }

    #[test]
    fn invalid_tag_compares_equal_to_keyword() {
        let snapshot = inputs(&[(1, TagInput::invalid(20.0)), (2, TagInput::valid(1.0))]);
        assert_eq!(strict("#1 = $INVALID", &snapshot), Ok(Value::Bool(true)));
        assert_eq!(strict("#2 = $INVALID", &snapshot), Ok(Value::Bool(false)));
        assert_eq!(strict("#2 != $INVALID", &snapshot), Ok(Value::Bool(true)));
        assert_eq!(strict("$INVALID = $INVALID", &snapshot), Ok(Value::Bool(true)));
    }

    #[test]
    fn sentinel_outside_equality_is_an_error() {
        let snapshot = inputs(&[(1, TagInput::invalid(20.0))]);
        // the keyword makes #1 a sentinel, which `>` then rejects
        assert_eq!(
            strict("#1 > 10 | #1 = $INVALID", &snapshot),
            Err(EvalError::InvalidTag { tag_id: 1 })
        );
        assert!(matches!(
            strict("$INVALID + 1", &snapshot),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert!(matches!(
            strict("$INVALID", &snapshot),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn equality_needs_matching_kinds() {
        let err = strict("1 = true", &TagInputs::new()).unwrap_err();
        assert_eq!(
            err,
            EvalError::mismatch("operator '=' cannot compare Number with Bool")
        );
    }

    #[test]
    fn logical_operators_need_bools() {
        assert_eq!(strict("true & !false", &TagInputs::new()), Ok(Value::Bool(true)));
        assert!(matches!(
            strict("1 | true", &TagInputs::new()),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert!(matches!(
            strict("!1", &TagInputs::new()),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn both_sides_are_evaluated() {
        assert_eq!(
            strict("false & (#9 > 1)", &TagInputs::new()),
            Err(EvalError::MissingTag { tag_id: 9 })
        );
        assert_eq!(
            strict("true | (#9 > 1)", &TagInputs::new()),
            Err(EvalError::MissingTag { tag_id: 9 })
        );
        // left error wins
        assert_eq!(
            strict("(#8 > 1) & (#9 > 1)", &TagInputs::new()),
            Err(EvalError::MissingTag { tag_id: 8 })
        );
    }

    #[test]
    fn force_mode_turns_bad_tags_into_sentinels() {
        let snapshot = inputs(&[(1, TagInput::invalid(20.0))]);
        let e = expr("#1 = $INVALID");
        let ctx = EvalContext::for_expression(&e, &snapshot, Mode::Force);
        assert_eq!(eval_value(&e, &ctx), Ok(Value::Bool(true)));

        let e = expr("#2 = $INVALID");
        let ctx = EvalContext::for_expression(&e, &snapshot, Mode::Force);
        assert_eq!(eval_value(&e, &ctx), Ok(Value::Bool(true)));

        let e = expr("#1 > 10");
        let ctx = EvalContext::for_expression(&e, &snapshot, Mode::Force);
        assert_eq!(eval_value(&e, &ctx), Err(EvalError::InvalidTag { tag_id: 1 }));
    }

    #[test]
    fn conditions_must_be_bool() {
        assert_eq!(
            eval_condition(&expr("1 + 1"), &TagInputs::new(), Mode::Strict),
            Err(EvalError::mismatch("clause condition must be Bool, got Number"))
        );
        assert_eq!(
            eval_condition(&expr("2 > 1"), &TagInputs::new(), Mode::Strict),
            Ok(true)
        );
    }
}
