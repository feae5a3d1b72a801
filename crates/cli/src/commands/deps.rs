use serde_json::json;
use tagrule_core::ParseOptions;

use super::{parse_rule, print_json};
use crate::error::CliError;
use crate::OutputFormat;

pub(crate) fn cmd_deps(
    rule: &str,
    options: &ParseOptions,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let form = parse_rule(rule, options)?;
    let ids = tagrule_eval::input_tag_ids(&form);

    if quiet {
        return Ok(());
    }
    match output {
        OutputFormat::Json => print_json(&json!({ "inputs": ids }))?,
        OutputFormat::Text => {
            for id in ids {
                println!("#{}", id);
            }
        }
    }
    Ok(())
}
