use std::path::PathBuf;

use serde::Serialize;
use tagrule_core::{ParseOptions, RuleForm, Value};
use tagrule_eval::{evaluate, force_evaluate, select_clause, Mode, TagInputs};
use tracing::debug;

use super::{parse_rule, print_json};
use crate::error::CliError;
use crate::inputs::{read_inputs_file, InputArgs};
use crate::OutputFormat;

#[derive(Serialize)]
struct EvalOutput {
    value: Option<Value>,
    /// 1-based index of the clause that supplied the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    clause: Option<usize>,
}

pub(crate) fn cmd_eval(
    rule: &str,
    files: &[PathBuf],
    args: &InputArgs,
    force: bool,
    options: &ParseOptions,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let form = parse_rule(rule, options)?;

    // later files override earlier ones, flags override files
    let mut inputs = TagInputs::new();
    for path in files {
        inputs.extend(read_inputs_file(path)?);
    }
    let inputs = args.apply(inputs)?;
    debug!(tags = inputs.len(), force, "evaluating rule");

    let result = if force {
        EvalOutput {
            value: force_evaluate(&form, &inputs),
            clause: None,
        }
    } else {
        strict(&form, &inputs)?
    };

    if quiet {
        return Ok(());
    }
    match output {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => match (&result.value, result.clause) {
            (Some(value), Some(clause)) => println!("{} (clause {})", value, clause),
            (Some(value), None) => println!("{}", value),
            (None, _) => println!("no value"),
        },
    }
    Ok(())
}

fn strict(form: &RuleForm, inputs: &TagInputs) -> Result<EvalOutput, CliError> {
    match form {
        RuleForm::Simple(_) => Ok(EvalOutput {
            value: Some(evaluate(form, inputs)?),
            clause: None,
        }),
        RuleForm::Guarded(clauses) | RuleForm::MultiReturn(clauses) => {
            let index = select_clause(clauses, inputs, Mode::Strict)?;
            Ok(EvalOutput {
                value: Some(clauses[index].result.clone()),
                clause: Some(index + 1),
            })
        }
    }
}
