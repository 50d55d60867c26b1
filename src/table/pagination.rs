//! # Pagination Store
//!
//! Session-scoped paging state: which page is shown, how big pages are, and how many records
//! the remote collection holds. The store is owned by the session actor; mutation goes through
//! the named operations below so that `has_next` is recomputed on every change.
//!
//! ## Policies
//!
//! * **Invalid sizes** passed to [`set_per_page`](PaginationStore::set_per_page) are rejected:
//!   the call is a no-op and logs a warning.
//! * **Out-of-range pages** passed to [`set_page`](PaginationStore::set_page) are clamped to the
//!   last page once the total is known.
//! * **Total count** is written only by fetch completion and optimistic cache patches, never by
//!   UI controls, so [`set_total_count`](PaginationStore::set_total_count) is crate-visible.

use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationStore {
    page_index: usize,
    page_size: usize,
    total_count: Option<u64>,
    has_next: bool,
    allowed_sizes: Vec<usize>,
}

impl PaginationStore {
    /// Creates a store on page 0.
    ///
    /// If `page_size` is not in `allowed_sizes` the first allowed size is used instead.
    pub fn new(allowed_sizes: Vec<usize>, page_size: usize) -> Self {
        let allowed_sizes: Vec<usize> = allowed_sizes.into_iter().filter(|s| *s > 0).collect();
        let page_size = if allowed_sizes.contains(&page_size) {
            page_size
        } else {
            allowed_sizes.first().copied().unwrap_or(10)
        };
        let mut store = Self {
            page_index: 0,
            page_size,
            total_count: None,
            has_next: false,
            allowed_sizes,
        };
        store.recompute();
        store
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `None` until the first successful fetch.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn allowed_sizes(&self) -> &[usize] {
        &self.allowed_sizes
    }

    /// Offset of the first record on the current page.
    pub fn skip(&self) -> u64 {
        (self.page_index as u64) * (self.page_size as u64)
    }

    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }

    /// Index of the last page; 0 when the total is unknown or zero.
    pub fn last_page(&self) -> usize {
        match self.total_count {
            Some(total) if total > 0 => {
                let size = self.page_size as u64;
                ((total + size - 1) / size - 1) as usize
            }
            _ => 0,
        }
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.has_next
    }

    /// Moves to `index`, clamped to the last page when the total is known.
    ///
    /// Returns `true` if the page index changed.
    pub fn set_page(&mut self, index: usize) -> bool {
        let target = if self.total_count.is_some() {
            index.min(self.last_page())
        } else {
            index
        };
        let changed = target != self.page_index;
        self.page_index = target;
        self.recompute();
        changed
    }

    /// Switches the page size and returns to page 0.
    ///
    /// Returns `false` (and changes nothing) if `size` is not an allowed size.
    pub fn set_per_page(&mut self, size: usize) -> bool {
        if !self.allowed_sizes.contains(&size) {
            warn!(size, allowed = ?self.allowed_sizes, "Rejected page size");
            return false;
        }
        self.page_size = size;
        self.page_index = 0;
        self.recompute();
        true
    }

    pub(crate) fn set_total_count(&mut self, total: u64) {
        self.total_count = Some(total);
        self.recompute();
    }

    /// Footer label for a page showing `rows_on_page` rows, e.g. `"11-20 of 194"`.
    pub fn window_label(&self, rows_on_page: usize) -> String {
        let total = self.total_count.unwrap_or(rows_on_page as u64);
        if rows_on_page == 0 {
            return format!("0-0 of {total}");
        }
        let first = self.skip() + 1;
        let last = self.skip() + rows_on_page as u64;
        format!("{first}-{last} of {total}")
    }

    fn recompute(&mut self) {
        let end = (self.page_index as u64 + 1) * self.page_size as u64;
        self.has_next = end < self.total_count.unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PaginationStore {
        PaginationStore::new(vec![10, 20, 30, 40, 50], 10)
    }

    #[test]
    fn walkthrough_with_194_records() {
        let mut pages = store();
        pages.set_total_count(194);
        assert!(pages.has_next());
        assert_eq!(pages.window_label(10), "1-10 of 194");

        assert!(pages.set_page(1));
        assert_eq!(pages.window_label(10), "11-20 of 194");

        assert!(pages.set_per_page(50));
        assert_eq!(pages.page_index(), 0);
        assert_eq!(pages.window_label(50), "1-50 of 194");

        pages.set_page(3);
        assert_eq!(pages.window_label(44), "151-194 of 194");
        assert!(!pages.has_next());
    }

    #[test]
    fn has_next_matches_formula_everywhere() {
        let mut pages = store();
        for total in [0u64, 1, 9, 10, 11, 49, 50, 194] {
            pages.set_total_count(total);
            for size in [10usize, 20, 30, 40, 50] {
                pages.set_per_page(size);
                for index in 0..=pages.last_page() {
                    pages.set_page(index);
                    let expected = (((index + 1) * size) as u64) < total;
                    assert_eq!(pages.has_next(), expected, "total={total} size={size} index={index}");
                }
            }
        }
    }

    #[test]
    fn per_page_always_resets_index() {
        let mut pages = store();
        pages.set_total_count(194);
        pages.set_page(4);
        assert!(pages.set_per_page(10));
        assert_eq!(pages.page_index(), 0);
    }

    #[test]
    fn invalid_size_is_rejected() {
        let mut pages = store();
        pages.set_total_count(194);
        pages.set_page(2);
        assert!(!pages.set_per_page(15));
        assert!(!pages.set_per_page(0));
        assert_eq!(pages.page_size(), 10);
        assert_eq!(pages.page_index(), 2);
    }

    #[test]
    fn set_page_clamps_to_last_page() {
        let mut pages = store();
        assert!(pages.set_page(7));
        assert_eq!(pages.page_index(), 7);

        pages.set_total_count(194);
        pages.set_page(100);
        assert_eq!(pages.page_index(), 19);
        assert!(!pages.can_next());
        assert!(pages.can_previous());
        assert!(!pages.set_page(19));
    }

    #[test]
    fn empty_collection() {
        let mut pages = store();
        pages.set_total_count(0);
        assert_eq!(pages.last_page(), 0);
        assert_eq!(pages.window_label(0), "0-0 of 0");
        assert!(!pages.can_previous());
        assert!(!pages.can_next());
    }

    #[test]
    fn unknown_default_size_falls_back() {
        let pages = PaginationStore::new(vec![20, 40], 10);
        assert_eq!(pages.page_size(), 20);
        assert_eq!(pages.skip(), 0);
        assert_eq!(pages.limit(), 20);
    }
}
