//! Authentication handler: exchanges credentials for a bearer token.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use validator::Validate;

use crate::api::dto::{LoginRequest, LoginResponse};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Creates the authentication routes
///
/// # Routes
/// - `POST /login` - Check credentials and issue a token
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// POST /login
///
/// Credentials are compared against the configured account. A body that is
/// not JSON is a bad request; a JSON body with missing or wrong fields is
/// reported as invalid credentials.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request("INVALID_REQUEST", rejection.body_text())
    })?;

    if payload.validate().is_err() || !state.auth.matches(&payload.username, &payload.password) {
        tracing::info!(username = %payload.username, "Login rejected");
        return Err(AppError::invalid_credentials());
    }

    let token = state.tokens.issue(&payload.username)?;
    tracing::info!(username = %payload.username, "Token issued");

    Ok(Json(LoginResponse::bearer(
        token,
        state.tokens.ttl().as_secs(),
    )))
}
