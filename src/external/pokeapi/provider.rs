use async_trait::async_trait;

use super::error::UpstreamError;
use super::types::{PageRequest, ResourceDetail, ResourcePage};

/// Read-only source of resources.
///
/// Implemented by the HTTP client in production and by in-memory fakes in
/// tests.
#[async_trait]
pub trait PokemonProvider: Send + Sync {
    async fn list(&self, page: PageRequest) -> Result<ResourcePage, UpstreamError>;

    /// `identifier` is already normalized (trimmed, lower-cased, non-empty).
    async fn detail(&self, identifier: &str) -> Result<ResourceDetail, UpstreamError>;
}
