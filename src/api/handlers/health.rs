//! Liveness endpoint for load balancers and uptime monitors.

use axum::{Router, extract::State, response::Json, routing::get};

use crate::api::dto::HealthResponse;
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /up` - Liveness probe
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/up", get(liveness_check))
}

/// Answers as long as the process is serving requests. Does not touch the
/// upstream, so an upstream outage never fails the probe.
pub async fn liveness_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.version.as_str()))
}
