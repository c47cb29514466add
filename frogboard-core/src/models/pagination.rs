//! Page windows over board listings

use serde::Serialize;

/// Upper bound on threads per page
const MAX_PER_PAGE: usize = 100;

/// Default threads per page
pub const DEFAULT_PER_PAGE: usize = 15;

/// Requested page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: usize,
    /// Items per page (1..=100)
    pub per_page: usize,
}

impl Pagination {
    /// Create a window; page is clamped to at least 1, per_page to 1..=100.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Number of items to skip.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// One page of results plus enough to draw page links
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Paginated<T> {
    /// Slice `all` according to `window`.
    pub fn from_window(all: Vec<T>, window: Pagination) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(window.offset())
            .take(window.per_page)
            .collect();

        Self {
            items,
            total,
            page: window.page,
            per_page: window.per_page,
        }
    }

    /// Total number of pages; an empty listing still has one page.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// 1-based page numbers for navigation links.
    pub fn page_numbers(&self) -> impl Iterator<Item = usize> {
        1..=self.total_pages()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_window() {
        assert_eq!(Pagination::new(0, 10).page, 1);
        assert_eq!(Pagination::new(1, 0).per_page, 1);
        assert_eq!(Pagination::new(1, 999).per_page, 100);
    }

    #[test]
    fn offset_calculation() {
        assert_eq!(Pagination::new(1, 15).offset(), 0);
        assert_eq!(Pagination::new(3, 15).offset(), 30);
    }

    #[test]
    fn slices_window() {
        let page = Paginated::from_window((1..=32).collect::<Vec<_>>(), Pagination::new(3, 15));
        assert_eq!(page.items, vec![31, 32]);
        assert_eq!(page.total, 32);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Paginated::from_window(vec![1, 2, 3], Pagination::new(5, 15));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn empty_listing_has_one_page() {
        let page: Paginated<u8> = Paginated::from_window(Vec::new(), Pagination::default());
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.page_numbers().collect::<Vec<_>>(), vec![1]);
        assert!(!page.has_next());
        assert!(!page.has_prev());
    }
}
