mod commands;
mod config;
mod error;
mod inputs;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::commands::{cmd_check, cmd_deps, cmd_eval, cmd_parse};
use crate::config::{CliConfig, LogLevel};
use crate::error::CliError;
use crate::inputs::InputArgs;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Tagrule rule expression toolchain.
#[derive(Parser)]
#[command(name = "tagrule", version, about = "Tagrule rule expression toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Reject unrecognised characters in rule text instead of skipping them
    #[arg(long, global = true)]
    strict_lexing: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Tag values for `eval` and `check`.
#[derive(Args)]
struct InputFlags {
    /// Valid tag value, e.g. `--tag 100=75.5`
    #[arg(long = "tag", value_name = "ID=VALUE")]
    tags: Vec<String>,

    /// Tag value marked invalid, e.g. `--invalid 101=true`
    #[arg(long = "invalid", value_name = "ID=VALUE")]
    invalid: Vec<String>,

    /// JSON file of tag values keyed by tag id (`check` treats each file as a sample)
    #[arg(long = "inputs", value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl InputFlags {
    fn args(&self) -> InputArgs<'_> {
        InputArgs {
            tags: &self.tags,
            invalid: &self.invalid,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a rule and print its dialect, inputs and canonical text
    Parse {
        /// Rule definition text
        #[arg(allow_hyphen_values = true)]
        rule: String,
    },

    /// Evaluate a rule against tag values
    Eval {
        /// Rule definition text
        #[arg(allow_hyphen_values = true)]
        rule: String,
        #[command(flatten)]
        inputs: InputFlags,
        /// Best-effort evaluation: print "no value" instead of failing
        #[arg(long)]
        force: bool,
    },

    /// Validate a rule; exits with status 1 when the rule is not usable
    Check {
        /// Rule definition text
        #[arg(allow_hyphen_values = true)]
        rule: String,
        #[command(flatten)]
        inputs: InputFlags,
    },

    /// List the tag ids a rule reads
    Deps {
        /// Rule definition text
        #[arg(allow_hyphen_values = true)]
        rule: String,
    },
}

fn load_config(cli: &Cli) -> Result<CliConfig, CliError> {
    let base = match &cli.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    Ok(base
        .with_env()?
        .apply_overrides(cli.log_level, cli.strict_lexing))
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            process::exit(1);
        }
    };
    logging::init_logging(&config);
    let options = config.parse_options();

    let result = match &cli.command {
        Commands::Parse { rule } => cmd_parse(rule, &options, cli.output, cli.quiet),
        Commands::Eval {
            rule,
            inputs,
            force,
        } => cmd_eval(
            rule,
            &inputs.files,
            &inputs.args(),
            *force,
            &options,
            cli.output,
            cli.quiet,
        ),
        Commands::Check { rule, inputs } => cmd_check(
            rule,
            &inputs.files,
            &inputs.args(),
            &options,
            cli.output,
            cli.quiet,
        ),
        Commands::Deps { rule } => cmd_deps(rule, &options, cli.output, cli.quiet),
    };

    if let Err(e) = result {
        report_error(&e.to_string(), cli.output, cli.quiet);
        process::exit(1);
    }
}

/// Report an error to stderr in the selected output format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
