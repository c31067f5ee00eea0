//! Pagination types for list endpoints.

use serde::Serialize;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Resolved pagination parameters.
///
/// Built from raw query values through `resolve`; zero falls back to the
/// defaults, matching the source API's numeric-fallback coercion.
#[derive(Debug, Clone, Copy)]
pub struct PaginationParams {
    pub page: u64,
    pub per_page: u64,
}

impl PaginationParams {
    /// Resolve raw query values, coercing absent or zero to the defaults.
    pub fn resolve(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE_NUMBER),
            per_page: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.limit()
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.per_page.min(MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
///
/// `total_count` and `total_pages` describe the full filtered set, computed
/// before pagination is applied.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(items: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };

        Self {
            items,
            page: params.page,
            total_pages,
            total_count: total,
        }
    }
}
