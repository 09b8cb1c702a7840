//! Paginated query results.

use serde::Serialize;

use crate::errors::{AppError, AppResult};

/// A validated page request: both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// # Errors
    /// Returns a validation error if `page` or `page_size` is zero.
    pub fn new(page: u64, page_size: u64) -> AppResult<Self> {
        if page == 0 {
            return Err(AppError::validation("page must be at least 1"));
        }
        if page_size == 0 {
            return Err(AppError::validation("page_size must be at least 1"));
        }
        Ok(Self { page, page_size })
    }

    /// 1-based page number
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of rows before this page
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One page of an ordered collection. Built per query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    /// Count of all matching rows, not just this page
    pub total: u64,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let seen = request.offset().saturating_add(items.len() as u64);
        Self {
            has_next: seen < total,
            items,
            page: request.page(),
            page_size: request.page_size(),
            total,
        }
    }

    /// Convert the items, keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            has_next: self.has_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_rejected() {
        assert!(matches!(PageRequest::new(0, 10), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(PageRequest::new(1, 0), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
    }

    #[test]
    fn test_offset_saturates() {
        let request = PageRequest::new(u64::MAX, u64::MAX).unwrap();
        assert_eq!(request.offset(), u64::MAX);
    }

    #[test]
    fn test_has_next_first_of_three() {
        let page = Page::new(vec!["a"], PageRequest::new(1, 1).unwrap(), 3);
        assert!(page.has_next);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_has_next_last_page() {
        let page = Page::new(vec!["c"], PageRequest::new(3, 1).unwrap(), 3);
        assert!(!page.has_next);
    }

    #[test]
    fn test_past_the_end_is_empty_without_next() {
        let page: Page<&str> = Page::new(vec![], PageRequest::new(5, 1).unwrap(), 3);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2).unwrap(), 5).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.page_size, 2);
        assert!(page.has_next);
    }
}
