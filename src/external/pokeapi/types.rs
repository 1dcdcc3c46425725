use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::PaginationError;

pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_OFFSET: u64 = 0;

/// A validated `(offset, limit)` window over the upstream collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    offset: u64,
    limit: u32,
}

impl PageRequest {
    pub fn new(offset: u64, limit: u32) -> Result<Self, PaginationError> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::InvalidLimit {
                min: MIN_LIMIT,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { offset, limit })
    }

    /// Build a page from raw query-string values.
    ///
    /// Absent or empty values take the defaults. Present values must be the
    /// canonical decimal form of a non-negative integer, so `"007"`, `"+5"`,
    /// `"1.5"` and `" 5"` are all rejected. Offsets are only capped by `u64`.
    pub fn from_query(offset: Option<&str>, limit: Option<&str>) -> Result<Self, PaginationError> {
        let offset = match present(offset) {
            None => DEFAULT_OFFSET,
            Some(raw) => parse_canonical(raw).ok_or(PaginationError::InvalidOffset)?,
        };

        let limit = match present(limit) {
            None => DEFAULT_LIMIT,
            Some(raw) => parse_canonical(raw)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(PaginationError::InvalidLimit {
                    min: MIN_LIMIT,
                    max: MAX_LIMIT,
                })?,
        };

        Self::new(offset, limit)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

fn parse_canonical(raw: &str) -> Option<u64> {
    let n: u64 = raw.parse().ok()?;
    (n.to_string() == raw).then_some(n)
}

/// Reference to a resource as it appears in a list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the upstream collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// Full upstream record for a single resource.
///
/// Only `id` and `name` are typed; every other upstream field is kept as-is
/// so that callers can reshape it without this crate tracking the upstream
/// schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDetail {
    pub id: u64,
    pub name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ResourceDetail {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}
