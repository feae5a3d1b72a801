//! Errors reported by the `tagrule` binary.

use std::path::PathBuf;

use tagrule_core::FormatError;
use tagrule_eval::EvalError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config file '{}': {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid inputs file '{}': {source}", .path.display())]
    InputsFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid tag assignment '{0}': expected ID=VALUE with a positive tag id")]
    TagAssignment(String),

    #[error("rule format error: {0}")]
    Format(#[from] FormatError),

    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("could not serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err = CliError::from(FormatError::new(4, "missing operand"));
        assert_eq!(
            err.to_string(),
            "rule format error: missing operand (at position 4)"
        );
        let err = CliError::from(EvalError::MissingTag { tag_id: 9 });
        assert_eq!(err.to_string(), "evaluation failed: tag #9 has no current value");
    }
}
