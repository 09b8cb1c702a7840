//! Pagination query parameters for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

/// Optional `?page=&page_size=` query.
///
/// With neither parameter present a listing is unpaginated.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number starting from 1
    pub page: Option<u64>,
    /// Users per page
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// `Some((page, page_size))` if pagination was asked for, with defaults filled in
    pub fn requested(&self) -> Option<(u64, u64)> {
        if self.page.is_none() && self.page_size.is_none() {
            return None;
        }

        Some((
            self.page.unwrap_or(DEFAULT_PAGE_NUMBER),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        ))
    }
}
