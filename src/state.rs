//! Application state for Axum web framework.
//!
//! Everything a handler needs is constructed once at startup and injected
//! here: the token service, the cached upstream service and the login
//! account. Cloning is cheap; the heavy parts sit behind `Arc`.

use std::sync::Arc;

use anyhow::Context;

use crate::cache::CacheManager;
use crate::config::{AuthConfig, Settings};
use crate::external::pokeapi::{PokeApiClient, PokemonProvider};
use crate::services::{PokemonService, TokenService};
use crate::utils::clock::SharedClock;

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub pokemon: PokemonService,
    /// The single account allowed to log in
    pub auth: AuthConfig,
    /// Reported by the liveness endpoint
    pub version: String,
}

impl AppState {
    pub fn new(tokens: TokenService, pokemon: PokemonService, auth: AuthConfig, version: String) -> Self {
        Self {
            tokens,
            pokemon,
            auth,
            version,
        }
    }

    /// Wire up production dependencies: the PokeAPI HTTP client and the
    /// configured cache backend.
    pub async fn from_settings(settings: &Settings, clock: SharedClock) -> anyhow::Result<Self> {
        let provider: Arc<dyn PokemonProvider> =
            Arc::new(PokeApiClient::from_config(&settings.upstream)?);
        Self::with_provider(settings, provider, clock).await
    }

    /// Same as [`AppState::from_settings`] but with a caller-supplied upstream.
    pub async fn with_provider(
        settings: &Settings,
        provider: Arc<dyn PokemonProvider>,
        clock: SharedClock,
    ) -> anyhow::Result<Self> {
        let cache = CacheManager::new(settings.cache.clone(), clock.clone())
            .await
            .context("failed to initialize cache backend")?;
        tracing::debug!(enabled = cache.is_enabled(), "Cache initialized");

        Ok(Self::new(
            TokenService::new(&settings.token, clock),
            PokemonService::new(provider, cache, &settings.upstream),
            settings.auth.clone(),
            settings.application.version.clone(),
        ))
    }
}
