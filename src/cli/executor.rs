//! Command executor for dispatching CLI commands

use super::handlers::ServeCommandHandler;
use super::parser::{Cli, Commands};
use crate::config::{Environment, settings::Settings};
use crate::error::{AppError, AppResult};

/// Run the parsed command against merged and validated settings.
pub async fn execute_command(cli: &Cli, settings: Settings, environment: Environment) -> AppResult<()> {
    cli.validate()
        .map_err(|msg| AppError::bad_request("INVALID_ARGUMENTS", msg))?;

    match cli.command() {
        Commands::Serve { dry_run, .. } => {
            ServeCommandHandler::new(settings, environment)
                .execute(dry_run)
                .await
        }
    }
}
