//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const TOKEN_TYPE: &str = "Bearer";

/// Login request payload
///
/// Missing fields deserialize as empty strings and fail validation, which
/// the handler reports as invalid credentials.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response carrying a freshly issued bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Always `"Bearer"`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

impl LoginResponse {
    pub fn bearer(token: String, expires_in: i64) -> Self {
        Self {
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in,
        }
    }
}
