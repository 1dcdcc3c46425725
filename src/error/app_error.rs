use thiserror::Error;

use crate::config::ConfigError;
use crate::external::pokeapi::{PaginationError, UpstreamError};
use crate::services::TokenError;

/// Application-wide error type that represents all possible errors in the system.
///
/// Domain errors from the token service, the upstream client and the
/// pagination parser convert into this type, which the API layer renders as
/// `{"error": {"code", "message"}}`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing, malformed or expired credentials
    #[error("Unauthorized ({code}): {message}")]
    Unauthorized { code: &'static str, message: String },

    /// Request parameters that failed validation
    #[error("Bad request ({code}): {message}")]
    BadRequest { code: &'static str, message: String },

    /// The upstream answered that the resource does not exist
    #[error("{entity} not found: {value}")]
    NotFound { entity: String, value: String },

    /// The upstream could not produce an answer
    #[error("Upstream request failed")]
    Upstream {
        #[source]
        source: UpstreamError,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn missing_token() -> Self {
        Self::unauthorized("MISSING_TOKEN", "Authorization header is required")
    }

    pub fn invalid_credentials() -> Self {
        Self::unauthorized("INVALID_CREDENTIALS", "Invalid username or password")
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::InvalidToken => Self::unauthorized("INVALID_TOKEN", error.to_string()),
            TokenError::Expired => Self::unauthorized("EXPIRED_TOKEN", error.to_string()),
            TokenError::EmptySubject => Self::bad_request("INVALID_REQUEST", error.to_string()),
            TokenError::Signing(_) => AppError::Internal {
                source: anyhow::Error::new(error),
            },
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(error: UpstreamError) -> Self {
        match error {
            UpstreamError::NotFound { resource } => AppError::NotFound {
                entity: "Pokemon".to_string(),
                value: resource,
            },
            other => AppError::Upstream { source: other },
        }
    }
}

impl From<PaginationError> for AppError {
    fn from(error: PaginationError) -> Self {
        let code = match error {
            PaginationError::InvalidOffset => "INVALID_OFFSET",
            PaginationError::InvalidLimit { .. } => "INVALID_LIMIT",
        };
        Self::bad_request(code, error.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = error.field().unwrap_or("configuration").to_string();
        AppError::Configuration {
            key,
            source: anyhow::Error::new(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
