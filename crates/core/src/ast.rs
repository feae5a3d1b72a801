//! Expression tree for rule definitions.
//!
//! These types are produced by the parser and consumed by the evaluator,
//! the validator and the dependency extractor. A parsed `RuleForm` is
//! immutable; redefining a rule means parsing a fresh one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifier of a tag referenced as `#<id>` in rule text. Always positive.
pub type TagId = i64;

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// The only value kinds the engine knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// Returns a human-readable kind name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "Str",
        }
    }

    /// True when both values are of the same kind.
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

// ──────────────────────────────────────────────
// Operators
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
        }
    }
}

impl BinaryOp {
    /// Canonical source symbol. `&&` and `||` parse to the same operators
    /// as `&` and `|`; the single-character form is canonical.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }

    /// Binding strength, 1 (loosest) to 7 (tightest).
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Ne => 3,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div => 6,
            BinaryOp::Pow => 7,
        }
    }

    pub fn is_right_associative(self) -> bool {
        self == BinaryOp::Pow
    }
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Value),
    TagRef(TagId),
    /// The `$INVALID` keyword.
    InvalidMarker,
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// True if `$INVALID` appears anywhere in this expression.
    pub fn uses_invalid_keyword(&self) -> bool {
        match self {
            Expression::InvalidMarker => true,
            Expression::Literal(_) | Expression::TagRef(_) => false,
            Expression::Unary { operand, .. } => operand.uses_invalid_keyword(),
            Expression::Binary { left, right, .. } => {
                left.uses_invalid_keyword() || right.uses_invalid_keyword()
            }
        }
    }

    /// Every tag id referenced in this expression, without duplicates.
    pub fn tag_ids(&self) -> BTreeSet<TagId> {
        let mut ids = BTreeSet::new();
        self.collect_tag_ids(&mut ids);
        ids
    }

    pub fn collect_tag_ids(&self, out: &mut BTreeSet<TagId>) {
        match self {
            Expression::TagRef(id) => {
                out.insert(*id);
            }
            Expression::Literal(_) | Expression::InvalidMarker => {}
            Expression::Unary { operand, .. } => operand.collect_tag_ids(out),
            Expression::Binary { left, right, .. } => {
                left.collect_tag_ids(out);
                right.collect_tag_ids(out);
            }
        }
    }

    /// True if the expression depends on anything besides literals, i.e.
    /// it holds a tag reference or the `$INVALID` keyword.
    pub fn references_inputs(&self) -> bool {
        match self {
            Expression::TagRef(_) | Expression::InvalidMarker => true,
            Expression::Literal(_) => false,
            Expression::Unary { operand, .. } => operand.references_inputs(),
            Expression::Binary { left, right, .. } => {
                left.references_inputs() || right.references_inputs()
            }
        }
    }
}

// ──────────────────────────────────────────────
// Rule forms
// ──────────────────────────────────────────────

/// A guarded "if condition then result" pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub condition: Expression,
    pub result: Value,
}

/// A parsed rule definition.
///
/// `Guarded` and `MultiReturn` differ only in the surface syntax they were
/// written in; both evaluate their clauses in declared order.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleForm {
    Simple(Expression),
    Guarded(Vec<Clause>),
    MultiReturn(Vec<Clause>),
}

impl RuleForm {
    /// Short name of the dialect, used in diagnostics and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            RuleForm::Simple(_) => "simple",
            RuleForm::Guarded(_) => "guarded",
            RuleForm::MultiReturn(_) => "multi-return",
        }
    }

    /// Clauses of a guarded form; empty for a simple expression.
    pub fn clauses(&self) -> &[Clause] {
        match self {
            RuleForm::Simple(_) => &[],
            RuleForm::Guarded(clauses) | RuleForm::MultiReturn(clauses) => clauses,
        }
    }

    /// Every top-level expression: the simple expression, or each clause
    /// condition in order.
    pub fn expressions(&self) -> Vec<&Expression> {
        match self {
            RuleForm::Simple(expr) => vec![expr],
            RuleForm::Guarded(clauses) | RuleForm::MultiReturn(clauses) => {
                clauses.iter().map(|c| &c.condition).collect()
            }
        }
    }
}
