//! Pagination types shared by the repository and the API surface.

use serde::{Deserialize, Serialize};

/// A request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page number.
    pub page: usize,
    /// Number of elements per page.
    pub size: usize,
}

impl PageRequest {
    /// Default page size used when the caller does not specify one.
    pub const DEFAULT_SIZE: usize = 20;

    /// Creates a page request; a zero size falls back to the default.
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: if size == 0 { Self::DEFAULT_SIZE } else { size },
        }
    }

    /// Returns the element offset of the first item on this page.
    pub fn offset(&self) -> usize {
        self.page * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }
}

/// One page of results together with paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Elements on this page.
    pub content: Vec<T>,
    /// Zero-based page number.
    pub page: usize,
    /// Requested page size.
    pub size: usize,
    /// Total number of matching elements across all pages.
    pub total_elements: usize,
}

impl<T> Page<T> {
    /// Builds a page from the full element count and the page slice.
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: usize) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    /// Returns an empty page for the given request.
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Total number of pages for the element count.
    pub fn total_pages(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.total_elements.div_ceil(self.size)
        }
    }

    /// Maps the page content, preserving metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_page_times_size() {
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 30);
    }

    #[test]
    fn zero_size_falls_back_to_default() {
        let req = PageRequest::new(2, 0);
        assert_eq!(req.size, PageRequest::DEFAULT_SIZE);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(0, 10), 21);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn empty_page_has_no_elements() {
        let page: Page<i32> = Page::empty(PageRequest::default());
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 0);
        assert_eq!(page.total_pages(), 0);
    }

    #[test]
    fn map_preserves_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2), 5);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.content, vec!["1", "2"]);
        assert_eq!(mapped.page, 1);
        assert_eq!(mapped.total_elements, 5);
    }
}
