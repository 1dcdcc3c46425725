//! Command-line interface: argument parsing, configuration merging and
//! command dispatch.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use anyhow::Context;

use crate::config::settings::Settings;
use crate::logger::init_logger;

/// Load file/env configuration and apply CLI overrides.
///
/// Returns the validated settings together with the environment they were
/// loaded for.
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<(Settings, crate::config::Environment)> {
    let merger = ConfigurationMerger::from_cli(cli).context("Failed to load configuration")?;
    let settings = merger
        .merge_cli_args(cli)
        .context("Invalid configuration")?;
    Ok((settings, merger.environment()))
}

pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Invalid logger configuration")?;
    init_logger(logger_config).context("Failed to initialize logger")
}

/// Full CLI entry point: configuration, logging, then the selected command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let (settings, environment) = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    execute_command(&cli, settings, environment).await?;
    Ok(())
}
