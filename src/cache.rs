//! # Query Cache
//!
//! Fetched pages are cached per [`QueryKey`]. Writes never refetch: the remote demo API does not
//! persist them, so a refetch would undo the user's change. Instead the session patches the
//! cached page in place with [`prepend_created`], [`merge_updated`] and [`remove_deleted`], and
//! the patched copy stays authoritative until the user navigates.
//!
//! Sorting happens locally over the loaded page, so it is not part of the key.

use catalog_framework::{Entity, Page};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};

/// Identity of one cached page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub scope: &'static str,
    pub page_index: usize,
    pub page_size: usize,
}

impl QueryKey {
    pub fn products(page_index: usize, page_size: usize) -> Self {
        Self {
            scope: "products",
            page_index,
            page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub fetched_at: DateTime<Utc>,
}

impl<T> From<Page<T>> for CachedPage<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            fetched_at: Utc::now(),
        }
    }
}

/// Minimal cache interface: read a page, or replace it with the result of an updater.
///
/// The updater receives the current entry (if any); returning `None` removes the entry.
pub trait QueryCache<T> {
    fn get(&self, key: &QueryKey) -> Option<&CachedPage<T>>;

    fn set<F>(&mut self, key: QueryKey, updater: F)
    where
        F: FnOnce(Option<CachedPage<T>>) -> Option<CachedPage<T>>;
}

/// In-memory [`QueryCache`] holding at most `capacity` pages; the least recently written page
/// is evicted first.
#[derive(Debug, Clone)]
pub struct PageCache<T> {
    entries: HashMap<QueryKey, CachedPage<T>>,
    order: VecDeque<QueryKey>,
    capacity: usize,
}

impl<T> PageCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn touch(&mut self, key: QueryKey) {
        self.order.retain(|k| *k != key);
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                tracing::debug!(?oldest, "Evicting cached page");
                self.entries.remove(&oldest);
            }
        }
    }
}

impl<T> QueryCache<T> for PageCache<T> {
    fn get(&self, key: &QueryKey) -> Option<&CachedPage<T>> {
        self.entries.get(key)
    }

    fn set<F>(&mut self, key: QueryKey, updater: F)
    where
        F: FnOnce(Option<CachedPage<T>>) -> Option<CachedPage<T>>,
    {
        let current = self.entries.remove(&key);
        match updater(current) {
            Some(page) => {
                self.entries.insert(key, page);
                self.touch(key);
            }
            None => self.order.retain(|k| *k != key),
        }
    }
}

// =============================================================================
// OPTIMISTIC PATCHES
// =============================================================================

/// Puts a newly created record at the head of the page and counts it in the total.
pub fn prepend_created<T: Entity>(page: &mut CachedPage<T>, created: T) -> bool {
    page.items.insert(0, created);
    page.total += 1;
    true
}

/// Shallow-merges the echoed fields into the matching record. Returns `false` if the record is
/// not on the page or the patch does not apply.
pub fn merge_updated<T: Entity>(page: &mut CachedPage<T>, id: &T::Id, patch: T::Patch) -> bool {
    let Some(item) = page.items.iter_mut().find(|item| item.id() == id) else {
        return false;
    };
    match item.apply_patch(patch) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(%id, error = %e, "Echoed update did not apply");
            false
        }
    }
}

/// Drops the matching record and uncounts it. Returns `false` if it was not on the page.
pub fn remove_deleted<T: Entity>(page: &mut CachedPage<T>, id: &T::Id) -> bool {
    let before = page.items.len();
    page.items.retain(|item| item.id() != id);
    if page.items.len() == before {
        return false;
    }
    page.total = page.total.saturating_sub(1);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Product, ProductId, ProductPatch};
    use crate::product_actor::sample_products;

    fn page(count: u32, total: u64) -> CachedPage<Product> {
        CachedPage::from(Page::new(sample_products(count), total, 0, 10))
    }

    #[test]
    fn created_goes_first_and_total_grows() {
        let mut cached = page(3, 194);
        let mut created = sample_products(1).remove(0);
        created.id = ProductId(195);
        assert!(prepend_created(&mut cached, created));
        assert_eq!(cached.items[0].id, ProductId(195));
        assert_eq!(cached.items.len(), 4);
        assert_eq!(cached.total, 195);
    }

    #[test]
    fn update_merges_only_echoed_fields() {
        let mut cached = page(3, 194);
        let brand = cached.items[1].brand.clone();
        let patch = ProductPatch {
            title: Some("Renamed".into()),
            ..Default::default()
        };
        assert!(merge_updated(&mut cached, &ProductId(2), patch.clone()));
        assert_eq!(cached.items[1].title, "Renamed");
        assert_eq!(cached.items[1].brand, brand);
        assert!(!merge_updated(&mut cached, &ProductId(99), patch));
    }

    #[test]
    fn update_with_invalid_echo_is_ignored() {
        let mut cached = page(1, 1);
        let patch = ProductPatch {
            price: Some(-3.0),
            ..Default::default()
        };
        assert!(!merge_updated(&mut cached, &ProductId(1), patch));
        assert!(cached.items[0].price > 0.0);
    }

    #[test]
    fn delete_removes_and_decrements() {
        let mut cached = page(3, 194);
        assert!(remove_deleted(&mut cached, &ProductId(2)));
        assert!(cached.items.iter().all(|p| p.id != ProductId(2)));
        assert_eq!(cached.total, 193);
        assert!(!remove_deleted(&mut cached, &ProductId(2)));
        assert_eq!(cached.total, 193);
    }

    #[test]
    fn cache_evicts_oldest_write() {
        let mut cache = PageCache::<Product>::new(2);
        for index in 0..3 {
            cache.set(QueryKey::products(index, 10), |_| Some(page(1, 194)));
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&QueryKey::products(0, 10)).is_none());
        assert!(cache.get(&QueryKey::products(2, 10)).is_some());
    }

    #[test]
    fn updater_sees_current_entry_and_can_remove_it() {
        let mut cache = PageCache::<Product>::new(4);
        let key = QueryKey::products(0, 10);
        cache.set(key, |_| Some(page(2, 194)));
        cache.set(key, |current| {
            let mut current = current?;
            remove_deleted(&mut current, &ProductId(1));
            Some(current)
        });
        assert_eq!(cache.get(&key).map(|p| p.total), Some(193));

        cache.set(key, |_| None);
        assert!(cache.is_empty());
        assert_ne!(key, QueryKey::products(0, 20));
    }
}
