//! PokeAPI upstream: typed payloads, failure classification and the HTTP
//! provider.

mod client;
mod error;
mod provider;
mod types;

pub use client::PokeApiClient;
pub use error::{PaginationError, UpstreamError};
pub use provider::PokemonProvider;
pub use types::{
    DEFAULT_LIMIT, DEFAULT_OFFSET, MAX_LIMIT, MIN_LIMIT, NamedResource, PageRequest,
    ResourceDetail, ResourcePage,
};
