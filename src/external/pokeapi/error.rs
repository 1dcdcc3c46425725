use thiserror::Error;

/// Classified failure of an upstream call.
///
/// A 404 is a definitive answer about the resource. Everything else that is
/// not a usable 200 (other statuses, timeouts, refused connections, bodies
/// that fail to decode) means the upstream could not answer right now.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Upstream unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl UpstreamError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>, source: Option<reqwest::Error>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Rejected pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Offset must be a non-negative integer")]
    InvalidOffset,

    #[error("Limit must be an integer between {min} and {max}")]
    InvalidLimit { min: u32, max: u32 },
}
