//! CLI configuration from a TOML file, environment variables and flags.
//!
//! Precedence, highest first: command-line flags, `TAGRULE_*` environment
//! variables, the `--config` file, built-in defaults.
//!
//! ```toml
//! log_level = "debug"
//! strict_lexing = true
//! ```

use std::env;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tagrule_core::ParseOptions;

use crate::error::CliError;

pub const LOG_LEVEL_VAR: &str = "TAGRULE_LOG_LEVEL";
pub const STRICT_LEXING_VAR: &str = "TAGRULE_STRICT_LEXING";

/// Log level matching the `tracing` levels. Defaults to `Warn` so that
/// normal runs keep stderr quiet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Tracing filter directive for this level.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// On-disk form of the configuration. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    log_level: Option<String>,
    strict_lexing: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub log_level: LogLevel,
    /// Reject unrecognised characters in rule text instead of skipping them.
    pub strict_lexing: bool,
}

impl CliConfig {
    /// Read a TOML config file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| CliError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = CliConfig::default();
        if let Some(level) = file.log_level {
            config.log_level = level.parse()?;
        }
        if let Some(strict) = file.strict_lexing {
            config.strict_lexing = strict;
        }
        Ok(config)
    }

    /// Overlay `TAGRULE_LOG_LEVEL` and `TAGRULE_STRICT_LEXING`.
    pub fn with_env(self) -> Result<Self, CliError> {
        self.with_vars(|name| env::var(name).ok())
    }

    /// Overlay variables obtained from `lookup`.
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        if let Some(val) = lookup(LOG_LEVEL_VAR) {
            self.log_level = val.parse()?;
        }
        if let Some(val) = lookup(STRICT_LEXING_VAR) {
            self.strict_lexing = parse_flag(STRICT_LEXING_VAR, &val)?;
        }
        Ok(self)
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>, strict_lexing: bool) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if strict_lexing {
            self.strict_lexing = true;
        }
        self
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict_lexing: self.strict_lexing,
        }
    }
}

fn parse_flag(name: &str, val: &str) -> Result<bool, CliError> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(CliError::InvalidConfig(format!(
            "invalid value '{val}' for {name}, expected true or false"
        ))),
    }
}
