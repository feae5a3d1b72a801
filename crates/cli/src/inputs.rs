//! Tag input snapshots from `--tag`/`--invalid` flags and JSON files.
//!
//! An inputs file is a JSON object keyed by tag id. Each entry is either a
//! bare value or an object with `value` and an optional `valid` flag:
//!
//! ```json
//! { "100": 75.0, "101": { "value": true, "valid": false } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tagrule_core::{parse_value, TagId, Value};
use tagrule_eval::{TagInput, TagInputs};

use crate::error::CliError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputEntry {
    Full(TagInput),
    Bare(Value),
}

impl From<InputEntry> for TagInput {
    fn from(entry: InputEntry) -> Self {
        match entry {
            InputEntry::Full(input) => input,
            InputEntry::Bare(value) => TagInput::valid(value),
        }
    }
}

/// Parse the contents of an inputs file.
pub fn parse_inputs(json: &str) -> Result<TagInputs, serde_json::Error> {
    let entries: BTreeMap<TagId, InputEntry> = serde_json::from_str(json)?;
    Ok(entries.into_iter().map(|(id, e)| (id, e.into())).collect())
}

pub fn read_inputs_file(path: &Path) -> Result<TagInputs, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_inputs(&content).map_err(|source| CliError::InputsFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse one `ID=VALUE` flag. The id may carry its `#` prefix.
pub fn parse_assignment(arg: &str, valid: bool) -> Result<(TagId, TagInput), CliError> {
    let (id, value) = arg
        .split_once('=')
        .ok_or_else(|| CliError::TagAssignment(arg.to_string()))?;
    let id: TagId = id
        .trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CliError::TagAssignment(arg.to_string()))?;
    if id <= 0 {
        return Err(CliError::TagAssignment(arg.to_string()));
    }
    let input = TagInput {
        value: parse_value(value),
        valid,
    };
    Ok((id, input))
}

/// Tag values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct InputArgs<'a> {
    pub tags: &'a [String],
    pub invalid: &'a [String],
}

impl InputArgs<'_> {
    /// Overlay the flag values on `base`. `--invalid` wins over `--tag` for
    /// the same id.
    pub fn apply(&self, mut base: TagInputs) -> Result<TagInputs, CliError> {
        for arg in self.tags {
            let (id, input) = parse_assignment(arg, true)?;
            base.insert(id, input);
        }
        for arg in self.invalid {
            let (id, input) = parse_assignment(arg, false)?;
            base.insert(id, input);
        }
        Ok(base)
    }
}

/// One snapshot per inputs file with the flag values on top, or a single
/// snapshot of just the flag values when no file is given.
pub fn load_samples(files: &[impl AsRef<Path>], args: &InputArgs) -> Result<Vec<TagInputs>, CliError> {
    if files.is_empty() {
        return Ok(vec![args.apply(TagInputs::new())?]);
    }
    files
        .iter()
        .map(|path| args.apply(read_inputs_file(path.as_ref())?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_and_full_entries() {
        let inputs =
            parse_inputs(r#"{ "100": 75.0, "101": { "value": true, "valid": false }, "102": "on" }"#)
                .unwrap();
        assert_eq!(inputs[&100], TagInput::valid(75.0));
        assert_eq!(inputs[&101], TagInput::invalid(true));
        assert_eq!(inputs[&102], TagInput::valid("on"));
    }

    #[test]
    fn non_numeric_keys_are_rejected() {
        assert!(parse_inputs(r#"{ "pump": 1 }"#).is_err());
        assert!(parse_inputs("[1, 2]").is_err());
    }

    #[test]
    fn assignments() {
        assert_eq!(
            parse_assignment("100=75", true).unwrap(),
            (100, TagInput::valid(75.0))
        );
        assert_eq!(
            parse_assignment("#7=open", false).unwrap(),
            (7, TagInput::invalid("open"))
        );
        assert_eq!(
            parse_assignment("3=\"12\"", true).unwrap(),
            (3, TagInput::valid("12"))
        );
        assert!(parse_assignment("100", true).is_err());
        assert!(parse_assignment("x=1", true).is_err());
        assert!(parse_assignment("0=1", true).is_err());
    }

    #[test]
    fn invalid_flag_wins() {
        let tags = vec!["1=5".to_string()];
        let invalid = vec!["1=5".to_string()];
        let args = InputArgs {
            tags: &tags,
            invalid: &invalid,
        };
        let inputs = args.apply(TagInputs::new()).unwrap();
        assert!(!inputs[&1].valid);
    }

    #[test]
    fn flags_alone_make_one_sample() {
        let tags = vec!["1=5".to_string()];
        let args = InputArgs {
            tags: &tags,
            invalid: &[],
        };
        let files: Vec<std::path::PathBuf> = Vec::new();
        let samples = load_samples(&files, &args).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0][&1], TagInput::valid(5.0));
    }
}
