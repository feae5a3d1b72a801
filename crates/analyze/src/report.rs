//! ValidationReport: the outcome of checking a rule before it is deployed.

use serde::Serialize;

/// Result of validating a rule. `message` is set exactly when `ok` is
/// false; warnings never affect `ok`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn passed(warnings: Vec<String>) -> Self {
        ValidationReport {
            ok: true,
            message: None,
            warnings,
        }
    }

    pub fn failed(message: impl Into<String>, warnings: Vec<String>) -> Self {
        ValidationReport {
            ok: false,
            message: Some(message.into()),
            warnings,
        }
    }
}
