//! Log initialisation for the `tagrule` binary.
//!
//! Logs go to stderr so that stdout carries only command output.

use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Install the global subscriber. A subscriber that is already installed
/// is kept.
pub fn init_logging(config: &CliConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
