//! # Table View State
//!
//! Everything the user has done to a table that is not paging: sorting, column visibility,
//! row selection, filters, the search box, and column pinning. The state is owned by the screen
//! (the session actor) and handed to [`TableEngine::compute`](super::TableEngine::compute) on
//! every render.
//!
//! Operations that depend on a column's flags take the column list, so that non-sortable
//! columns cannot be sorted and non-hideable columns cannot be hidden.

use super::column::{CellValue, ColumnDef};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Case-insensitive substring match on the value's text.
    Contains(String),
    Equals(CellValue),
    /// Inclusive numeric range; non-numbers never match.
    Range { min: Option<f64>, max: Option<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    pub key: String,
    pub op: FilterOp,
}

impl ColumnFilter {
    pub fn matches(&self, value: &CellValue) -> bool {
        match &self.op {
            FilterOp::Contains(needle) => value
                .to_text()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            FilterOp::Equals(expected) => value.sort_cmp(expected).is_eq(),
            FilterOp::Range { min, max } => match value.as_number() {
                Some(n) => min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPinning {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl ColumnPinning {
    pub fn side(&self, key: &str) -> Option<PinSide> {
        if self.left.iter().any(|k| k == key) {
            Some(PinSide::Left)
        } else if self.right.iter().any(|k| k == key) {
            Some(PinSide::Right)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableViewState<K: Eq + Hash> {
    pub sorting: Vec<SortSpec>,
    pub column_visibility: HashMap<String, bool>,
    pub row_selection: HashSet<K>,
    pub column_filters: Vec<ColumnFilter>,
    pub search: String,
    pub pinning: ColumnPinning,
}

impl<K: Eq + Hash> Default for TableViewState<K> {
    fn default() -> Self {
        Self {
            sorting: Vec::new(),
            column_visibility: HashMap::new(),
            row_selection: HashSet::new(),
            column_filters: Vec::new(),
            search: String::new(),
            pinning: ColumnPinning::default(),
        }
    }
}

fn find<'a>(columns: &'a [ColumnDef], key: &str) -> Option<&'a ColumnDef> {
    columns.iter().find(|c| c.key == key)
}

impl<K: Eq + Hash + Clone> TableViewState<K> {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- sorting ----

    pub fn sort_direction(&self, key: &str) -> Option<SortDirection> {
        self.sorting
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.direction)
    }

    /// Single-column sort cycling ascending, descending, unsorted.
    ///
    /// Returns `false` for unknown or non-sortable columns.
    pub fn toggle_sort(&mut self, columns: &[ColumnDef], key: &str) -> bool {
        if !find(columns, key).is_some_and(|c| c.sortable) {
            return false;
        }
        let next = match self.sort_direction(key) {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };
        self.sorting.clear();
        if let Some(direction) = next {
            self.sorting.push(SortSpec {
                key: key.to_string(),
                direction,
            });
        }
        true
    }

    /// Adds (or moves to the end) a secondary sort key.
    pub fn add_sort(&mut self, columns: &[ColumnDef], key: &str, direction: SortDirection) -> bool {
        if !find(columns, key).is_some_and(|c| c.sortable) {
            return false;
        }
        self.sorting.retain(|s| s.key != key);
        self.sorting.push(SortSpec {
            key: key.to_string(),
            direction,
        });
        true
    }

    pub fn clear_sort(&mut self) {
        self.sorting.clear();
    }

    // ---- visibility ----

    pub fn is_visible(&self, column: &ColumnDef) -> bool {
        if !column.hideable {
            return true;
        }
        self.column_visibility
            .get(column.key)
            .copied()
            .unwrap_or(column.visible_by_default)
    }

    /// Returns `false` for unknown or non-hideable columns.
    pub fn set_visibility(&mut self, columns: &[ColumnDef], key: &str, visible: bool) -> bool {
        match find(columns, key) {
            Some(column) if column.hideable => {
                self.column_visibility.insert(key.to_string(), visible);
                true
            }
            _ => false,
        }
    }

    pub fn toggle_visibility(&mut self, columns: &[ColumnDef], key: &str) -> bool {
        match find(columns, key) {
            Some(column) if column.hideable => {
                let visible = self.is_visible(column);
                self.set_visibility(columns, key, !visible)
            }
            _ => false,
        }
    }

    // ---- selection ----

    /// Flips the row's selection; returns whether it is now selected.
    pub fn toggle_row(&mut self, key: K) -> bool {
        if self.row_selection.remove(&key) {
            false
        } else {
            self.row_selection.insert(key);
            true
        }
    }

    pub fn select_all(&mut self, keys: impl IntoIterator<Item = K>) {
        self.row_selection.extend(keys);
    }

    pub fn clear_selection(&mut self) {
        self.row_selection.clear();
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.row_selection.contains(key)
    }

    // ---- filtering ----

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Replaces any filter on the same column.
    pub fn set_filter(&mut self, filter: ColumnFilter) {
        self.column_filters.retain(|f| f.key != filter.key);
        self.column_filters.push(filter);
    }

    pub fn remove_filter(&mut self, key: &str) {
        self.column_filters.retain(|f| f.key != key);
    }

    // ---- pinning ----

    pub fn pin(&mut self, key: &str, side: PinSide) {
        self.unpin(key);
        let list = match side {
            PinSide::Left => &mut self.pinning.left,
            PinSide::Right => &mut self.pinning.right,
        };
        list.push(key.to_string());
    }

    pub fn unpin(&mut self, key: &str) {
        self.pinning.left.retain(|k| k != key);
        self.pinning.right.retain(|k| k != key);
    }
}
