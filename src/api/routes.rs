//! Router configuration for the API.

use axum::{Router, http::StatusCode, middleware};
use tower_http::compression::CompressionLayer;

use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID - generates/propagates request IDs
/// 2. Logging - logs requests with request IDs
/// 3. Compression - encodes the final body, error envelopes included
/// 4. Error handler - normalizes error bodies and attaches the request ID
///
/// # Routes
/// - `GET /up` - public
/// - `POST /login` - public
/// - `GET /pokemons`, `GET /pokemons/{id}` - bearer token required
pub fn create_router(state: AppState) -> Router {
    let protected = handlers::pokemons::pokemon_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    Router::new()
        .merge(handlers::health::health_routes())
        .merge(handlers::auth::auth_routes())
        .merge(protected)
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::from_fn(global_error_handler))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
