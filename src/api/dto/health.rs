//! Health check DTOs for API responses.

use serde::{Deserialize, Serialize};

/// Liveness response for `GET /up`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process can answer
    pub status: String,
    /// Application version
    pub version: String,
}

impl HealthResponse {
    pub fn ok(version: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            version: version.into(),
        }
    }
}
