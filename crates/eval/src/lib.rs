//! Tagrule evaluator -- computes a rule tag's value from a parsed
//! `RuleForm` and a snapshot of its input tags.
//!
//! Two modes are offered:
//! - [`evaluate`] is strict and reports every failure as an [`EvalError`];
//! - [`force_evaluate`] is best-effort and yields `None` instead of failing.
//!
//! Evaluation is a pure function of its arguments, so one `RuleForm` can be
//! evaluated from many threads at once.

pub mod deps;
pub mod numeric;
pub mod predicate;
pub mod rules;
pub mod types;

pub use deps::input_tag_ids;
pub use predicate::{eval_condition, Mode};
pub use rules::{eval_form, evaluate, force_evaluate, select_clause};
pub use types::{EvalError, TagInput, TagInputs};
