use serde::Serialize;
use tagrule_core::{ParseOptions, TagId};

use super::{parse_rule, print_json};
use crate::error::CliError;
use crate::OutputFormat;

#[derive(Serialize)]
struct ParseSummary {
    kind: &'static str,
    clauses: usize,
    inputs: Vec<TagId>,
    uses_invalid: bool,
    canonical: String,
}

pub(crate) fn cmd_parse(
    rule: &str,
    options: &ParseOptions,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let form = parse_rule(rule, options)?;
    let summary = ParseSummary {
        kind: form.kind(),
        clauses: form.clauses().len(),
        inputs: tagrule_eval::input_tag_ids(&form).into_iter().collect(),
        uses_invalid: form.expressions().iter().any(|e| e.uses_invalid_keyword()),
        canonical: form.to_string(),
    };

    if quiet {
        return Ok(());
    }
    match output {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => {
            println!("kind: {}", summary.kind);
            if summary.clauses > 0 {
                println!("clauses: {}", summary.clauses);
            }
            let inputs: Vec<String> = summary.inputs.iter().map(|id| format!("#{}", id)).collect();
            println!("inputs: {}", inputs.join(" "));
            println!("canonical: {}", summary.canonical);
        }
    }
    Ok(())
}
