//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::{Environment, settings::Settings};
use crate::error::AppResult;
use crate::external::pokeapi::PokeApiClient;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Run the server, or with `dry_run` only check that it could start.
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config, self.environment).run().await?;
        Ok(())
    }

    /// Validate configuration and build the upstream client without binding
    /// a socket or contacting any backend.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid ({})", self.environment.as_str());
        println!("✓ Server would bind to: {}", self.config.server.address());

        let client = PokeApiClient::from_config(&self.config.upstream)?;
        println!("✓ Upstream client configured for: {}", client.base_url());

        println!(
            "✓ Cache: {}",
            if self.config.cache.enabled {
                format!("{:?}", self.config.cache.backend).to_lowercase()
            } else {
                "disabled".to_string()
            }
        );
        println!("✓ Logger level: {}", self.config.logger.level);

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
