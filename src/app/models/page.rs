//! Pagination types for tariff queries
//!
//! Page numbers are zero-based. A page past the end of the result set is
//! empty but still reports the totals.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Requested slice of a query result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    /// Create a page request, rejecting a zero page size
    pub fn new(page: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_page_request("page size must be greater than 0"));
        }
        Ok(Self { page, size })
    }

    /// Index of the first element on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// One page of query results with totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// Cut the requested page out of a complete, already ordered result set
    pub fn from_slice(items: &[T], request: PageRequest) -> Self {
        let total_elements = items.len();
        let content = items
            .iter()
            .skip(request.offset())
            .take(request.size)
            .cloned()
            .collect();

        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(request.size),
        }
    }
}

impl<T> Page<T> {
    /// One-based page number for display
    pub fn ordinal(&self) -> usize {
        self.number.saturating_add(1)
    }

    pub fn is_last(&self) -> bool {
        self.ordinal() >= self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_rejects_zero_size() {
        assert!(PageRequest::new(0, 0).is_err());
        assert_eq!(PageRequest::new(2, 10).unwrap().offset(), 20);
    }

    #[test]
    fn test_from_slice_middle_page() {
        let items: Vec<u32> = (1..=25).collect();
        let page = Page::from_slice(&items, PageRequest::new(1, 10).unwrap());

        assert_eq!(page.content, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 3);
        assert!(!page.is_last());
    }

    #[test]
    fn test_from_slice_past_end() {
        let items = vec!["a", "b", "c"];
        let page = Page::from_slice(&items, PageRequest::new(5, 2).unwrap());

        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert!(page.is_last());
    }

    #[test]
    fn test_from_slice_last_possible_page_number() {
        let page = Page::from_slice(&[1u8, 2, 3], PageRequest::new(usize::MAX, 1).unwrap());

        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.ordinal(), usize::MAX);
        assert!(page.is_last());
    }

    #[test]
    fn test_from_slice_empty() {
        let items: Vec<u8> = Vec::new();
        let page = Page::from_slice(&items, PageRequest::new(0, 20).unwrap());

        assert_eq!(page.total_pages, 0);
        assert!(page.is_last());
    }
}
