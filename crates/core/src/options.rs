use serde::{Deserialize, Serialize};

/// Knobs for turning rule text into a `RuleForm`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Reject characters and words the lexer does not recognise instead of
    /// skipping them. Historical rule text relies on the lenient default.
    pub strict_lexing: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions {
            strict_lexing: true,
        }
    }
}
