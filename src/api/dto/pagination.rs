//! Pagination query parameters.

use serde::Deserialize;

use crate::external::pokeapi::{PageRequest, PaginationError};

/// Raw `offset`/`limit` query values.
///
/// Kept as strings so that `?limit=abc` reaches the handler and is reported
/// as `INVALID_LIMIT` rather than as a generic query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl PaginationParams {
    pub fn page_request(&self) -> Result<PageRequest, PaginationError> {
        PageRequest::from_query(self.offset.as_deref(), self.limit.as_deref())
    }
}
