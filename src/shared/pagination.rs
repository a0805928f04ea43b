//! Pagination Parameters
//!
//! Query-string normalization shared by every list endpoint.
//!
//! `page` and `limit` are taken from the raw query string and clamped the same
//! way everywhere: anything unparsable, negative or above [`MAX_PAGE`] /
//! [`MAX_LIMIT`] falls back to the default. A value of exactly `0` is kept and
//! means "omit this stage", which the unpaginated `/list/all` routes rely on.

use serde::Deserialize;

/// Highest accepted page number.
pub const MAX_PAGE: i64 = 100;

/// Highest accepted page size.
pub const MAX_LIMIT: i64 = 100;

/// Page used when the requested one is out of range.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the requested one is out of range.
pub const DEFAULT_LIMIT: u32 = 10;

/// Raw pagination query, kept as strings so bad input is normalized instead of rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Normalized pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// No skip and no limit stage: the full result set.
    pub const fn all() -> Self {
        Self { page: 0, limit: 0 }
    }

    /// Normalize raw query values.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: clamp(page, MAX_PAGE, DEFAULT_PAGE),
            limit: clamp(limit, MAX_LIMIT, DEFAULT_LIMIT),
        }
    }

    /// Number of documents to skip, `None` when the stage must be omitted.
    pub fn skip(&self) -> Option<u64> {
        if self.page == 0 || self.limit == 0 {
            return None;
        }
        Some(u64::from(self.page - 1) * u64::from(self.limit))
    }

    /// Maximum number of documents, `None` when the stage must be omitted.
    pub fn limit(&self) -> Option<u64> {
        (self.limit != 0).then(|| u64::from(self.limit))
    }
}

impl From<&PaginationQuery> for Pagination {
    fn from(query: &PaginationQuery) -> Self {
        Self::from_raw(query.page.as_deref(), query.limit.as_deref())
    }
}

fn clamp(raw: Option<&str>, max: i64, default: u32) -> u32 {
    match raw.map(str::trim).and_then(|v| v.parse::<i64>().ok()) {
        Some(value) if (0..=max).contains(&value) => value as u32,
        _ => default,
    }
}
