//! Read-through cache in front of the upstream provider.

use std::sync::Arc;

use crate::cache::CacheManager;
use crate::config::settings::UpstreamConfig;
use crate::external::pokeapi::{
    PageRequest, PokemonProvider, ResourceDetail, ResourcePage, UpstreamError,
};

/// Serves list and detail lookups, memoizing successful upstream answers.
///
/// List pages and detail records have separate TTLs. Failed lookups are never
/// cached, so the next request after an outage goes straight to the upstream.
#[derive(Clone)]
pub struct PokemonService {
    provider: Arc<dyn PokemonProvider>,
    cache: CacheManager,
    list_ttl: u64,
    detail_ttl: u64,
}

impl PokemonService {
    pub fn new(provider: Arc<dyn PokemonProvider>, cache: CacheManager, config: &UpstreamConfig) -> Self {
        Self {
            provider,
            cache,
            list_ttl: config.list_cache_ttl,
            detail_ttl: config.detail_cache_ttl,
        }
    }

    pub async fn list_resources(&self, page: PageRequest) -> Result<ResourcePage, UpstreamError> {
        let key = list_cache_key(&page);
        self.cache
            .get_or_fetch(&key, self.list_ttl, || self.provider.list(page))
            .await
    }

    /// Look up one resource by numeric id or case-insensitive name.
    ///
    /// A blank identifier cannot name anything and is answered with
    /// `NotFound` without contacting the upstream.
    pub async fn get_resource(&self, identifier: &str) -> Result<ResourceDetail, UpstreamError> {
        let normalized = normalize_identifier(identifier);
        if normalized.is_empty() {
            return Err(UpstreamError::not_found("pokemon/"));
        }

        let key = detail_cache_key(&normalized);
        self.cache
            .get_or_fetch(&key, self.detail_ttl, || self.provider.detail(&normalized))
            .await
    }
}

fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

fn list_cache_key(page: &PageRequest) -> String {
    format!(
        "pokeapi:list:offset={}:limit={}",
        page.offset(),
        page.limit()
    )
}

fn detail_cache_key(normalized: &str) -> String {
    format!("pokeapi:detail:{}", normalized)
}
