//! Cache error types.

use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// These never reach HTTP clients: the cache manager logs them and falls back
/// to the upstream source.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache operation failed: {0}")]
    Operation(String),

    #[error("Cache connection failed: {0}")]
    Connection(String),
}
