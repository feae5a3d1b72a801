pub(crate) mod check;
pub(crate) mod deps;
pub(crate) mod eval;
pub(crate) mod parse;

use serde::Serialize;
use tagrule_core::{parse_with, ParseOptions, RuleForm};
use tracing::debug;

use crate::error::CliError;

pub(crate) use check::cmd_check;
pub(crate) use deps::cmd_deps;
pub(crate) use eval::cmd_eval;
pub(crate) use parse::cmd_parse;

fn parse_rule(rule: &str, options: &ParseOptions) -> Result<RuleForm, CliError> {
    let form = parse_with(rule, options)?;
    debug!(kind = form.kind(), clauses = form.clauses().len(), "parsed rule");
    Ok(form)
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
