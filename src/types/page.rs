//! Pagination types
//!
//! Pages are zero-indexed. A `Page` carries the slice actually returned plus
//! the total match count so callers can compute how many pages exist.

use crate::errors::{RepositoryError, Result};
use serde::{Deserialize, Serialize};

/// Default page size used by the CLI and `find_all` helpers
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page request: index and maximum size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    /// Create a page request, rejecting zero-sized pages and offsets past `usize::MAX`
    pub fn new(page: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(RepositoryError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        if page.checked_mul(size).is_none() {
            return Err(RepositoryError::Validation(format!(
                "page {} of size {} is out of range",
                page, size
            )));
        }
        Ok(Self { page, size })
    }

    /// First page with the given size
    pub fn first(size: usize) -> Result<Self> {
        Self::new(0, size)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the first element on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A bounded slice of an ordered result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    content: Vec<T>,
    request: PageRequest,
    total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            request,
            total_elements,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Number of elements on this page
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// Total number of matches across all pages
    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn number(&self) -> usize {
        self.request.page()
    }

    pub fn size(&self) -> usize {
        self.request.size()
    }

    pub fn total_pages(&self) -> u64 {
        let size = self.request.size() as u64;
        self.total_elements.div_ceil(size)
    }

    pub fn has_next(&self) -> bool {
        (self.request.page() as u64).saturating_add(1) < self.total_pages()
    }

    pub fn is_first(&self) -> bool {
        self.request.page() == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }
}
