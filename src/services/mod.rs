//! Service layer sitting between the HTTP handlers and the upstream/cache
//! plumbing.

mod pokemon_service;
mod token_service;

pub use pokemon_service::PokemonService;
pub use token_service::{TokenError, TokenService};
