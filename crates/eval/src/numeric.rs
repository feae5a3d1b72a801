//! Arithmetic and ordering on `Number` operands.
//!
//! Numbers are IEEE `f64`. Division by zero is an error rather than an
//! infinity; every other operation follows the float semantics.

use tagrule_core::{BinaryOp, Value};

use crate::types::EvalError;

fn numbers(op: BinaryOp, left: &Value, right: &Value) -> Result<(f64, f64), EvalError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(EvalError::mismatch(format!(
            "operator '{}' needs Number operands, got {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Apply `+ - * / ^`.
pub fn eval_arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (l, r) = numbers(op, left, right)?;
    let n = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => {
            if r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            l / r
        }
        BinaryOp::Pow => l.powf(r),
        other => {
            return Err(EvalError::mismatch(format!(
                "'{}' is not an arithmetic operator",
                other.symbol()
            )))
        }
    };
    Ok(Value::Number(n))
}

/// Apply `< <= > >=`.
pub fn compare_numbers(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    let (l, r) = numbers(op, left, right)?;
    match op {
        BinaryOp::Lt => Ok(l < r),
        BinaryOp::Le => Ok(l <= r),
        BinaryOp::Gt => Ok(l > r),
        BinaryOp::Ge => Ok(l >= r),
        other => Err(EvalError::mismatch(format!(
            "'{}' is not a relational operator",
            other.symbol()
        ))),
    }
}

/// Unary minus.
pub fn negate(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Number(n) => Ok(Value::Number(-n)),
        other => Err(EvalError::mismatch(format!(
            "operator '-' needs a Number operand, got {}",
            other.type_name()
        ))),
    }
}
