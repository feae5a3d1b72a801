//! tagrule-core: the rule expression language.
//!
//! Turns rule definition text into an immutable [`RuleForm`]:
//!
//! - a simple expression such as `(#100 + #101) / 2`,
//! - ordered guarded clauses such as `(#1 < 10)[1],true[0]`,
//! - multi-return clauses such as `(#1 = 1) | (#1 = 2)[LOW] | true[HIGH]`.
//!
//! # Public API
//!
//! - [`parse()`] / [`parse_with()`] -- rule text to [`RuleForm`]
//! - [`parse_value()`] -- literal text to [`Value`]
//! - [`FormatError`] -- malformed rule text
//! - [`ParseOptions`] -- lexer leniency
//! - AST types: [`Value`], [`Expression`], [`Clause`], [`RuleForm`],
//!   [`UnaryOp`], [`BinaryOp`], [`TagId`]
//!
//! `RuleForm` implements `Display`, producing canonical text that parses
//! back to an equal form.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod serialize;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::{BinaryOp, Clause, Expression, RuleForm, TagId, UnaryOp, Value};
pub use error::FormatError;
pub use options::ParseOptions;
pub use parser::{parse, parse_value, parse_with};
