use std::path::PathBuf;
use std::process;

use tagrule_analyze::{validate, validate_samples};
use tagrule_core::ParseOptions;

use super::{parse_rule, print_json};
use crate::error::CliError;
use crate::inputs::{load_samples, InputArgs};
use crate::OutputFormat;

/// Validate a rule. Exits with status 1 when the report is not ok.
pub(crate) fn cmd_check(
    rule: &str,
    files: &[PathBuf],
    args: &InputArgs,
    options: &ParseOptions,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let form = parse_rule(rule, options)?;
    let samples = load_samples(files, args)?;
    let report = match samples.as_slice() {
        [only] => validate(&form, only),
        many => validate_samples(&form, many),
    };

    if !quiet {
        match output {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Text => {
                match &report.message {
                    Some(message) => println!("not ok: {}", message),
                    None => println!("ok"),
                }
                for warning in &report.warnings {
                    println!("warning: {}", warning);
                }
            }
        }
    }
    if !report.ok {
        process::exit(1);
    }
    Ok(())
}
