//! A single page of a remote collection.

/// One window of a collection as returned by a `list(skip, limit)` call.
///
/// `total` is the size of the whole collection on the server, not of `items`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, skip: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            skip,
            limit,
        }
    }

    /// An empty page for a collection with no records.
    pub fn empty(skip: u64, limit: u64) -> Self {
        Self::new(Vec::new(), 0, skip, limit)
    }

    /// Whether records exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.skip + (self.items.len() as u64) < self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_more_uses_server_total() {
        let page = Page::new(vec![1, 2, 3], 10, 0, 3);
        assert!(page.has_more());

        let last = Page::new(vec![10], 10, 9, 3);
        assert!(!last.has_more());

        let empty: Page<u8> = Page::empty(0, 10);
        assert!(!empty.has_more());
    }
}
