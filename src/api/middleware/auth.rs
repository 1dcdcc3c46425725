//! Bearer-token authentication middleware.
//!
//! The token is checked in two steps so that clients can tell a forged or
//! garbled token (`INVALID_TOKEN`) from one that merely ran out
//! (`EXPIRED_TOKEN`).

use std::sync::LazyLock;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::TokenError;
use crate::state::AppState;
use crate::utils::jwt::Claims;

static BEARER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\ABearer\s+(.+)\z").expect("bearer pattern is a valid regex")
});

/// Extension type for authenticated user information
///
/// This is added to request extensions after successful authentication
/// and can be extracted in handlers using `Extension<AuthUser>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
    /// Expiry of the presented token, epoch seconds
    pub expires_at: Option<i64>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            expires_at: claims.exp,
        }
    }
}

/// Token part of an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(value: &str) -> Option<&str> {
    BEARER
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rejects the request unless it carries a valid, unexpired bearer token.
///
/// # Errors
/// - `MISSING_TOKEN` when the header is absent or not a bearer header
/// - `INVALID_TOKEN` when the signature or purpose does not check out
/// - `EXPIRED_TOKEN` when the token is authentic but past its expiry
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned)
        .ok_or_else(AppError::missing_token)?;

    match state.tokens.is_expired(&token) {
        Err(_) => return Err(TokenError::InvalidToken.into()),
        Ok(true) => return Err(TokenError::Expired.into()),
        Ok(false) => {}
    }

    let claims = state.tokens.verify(&token)?;
    tracing::debug!(user = %claims.sub, "Request authenticated");
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}
