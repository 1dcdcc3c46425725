//! Data Transfer Objects for API requests and responses.
//!
//! - `auth` - login request/response
//! - `error` - the `{"error": {...}}` envelope
//! - `pagination` - raw offset/limit query parameters
//! - `pokemon` - list and detail reshaping of upstream payloads

mod auth;
mod error;
mod health;
mod pagination;
mod pokemon;

pub use auth::{LoginRequest, LoginResponse, TOKEN_TYPE};
pub use error::{ErrorEnvelope, ErrorResponse};
pub use health::HealthResponse;
pub use pagination::PaginationParams;
pub use pokemon::{
    AbilityResponse, PokemonDetailResponse, PokemonListResponse, PokemonSummary, SpritesResponse,
};
