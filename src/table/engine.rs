//! # Table Engine
//!
//! A pure function from `(rows, columns, view state, windowing)` to a [`TableModel`]: the header
//! layout, the rows to show (as indices into the input), and selection bookkeeping. Nothing is
//! cached between calls.
//!
//! ## Pipeline
//!
//! 1. **Filter**: the search text (case-insensitive, over searchable columns) and every column
//!    filter must match.
//! 2. **Sort**: stable sort by the sort specs in order; equal keys keep their fetch order in both
//!    directions. Only the loaded rows are sorted.
//! 3. **Window**: with [`Windowing::Remote`] the rows already are the server's page; with
//!    [`Windowing::Local`] the engine slices the page itself.

use super::column::{ColumnDef, TableRow};
use super::view::{PinSide, SortDirection, TableViewState};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Windowing {
    /// The rows are the current server page; show all of them.
    Remote,
    /// The rows are the whole collection; show one page of it.
    Local { page_index: usize, page_size: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub hideable: bool,
    pub sort: Option<SortDirection>,
    pub pinned: Option<PinSide>,
    /// Index into the column list passed to the engine.
    pub column: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionSummary {
    /// Selected rows among the shown rows.
    pub selected: usize,
    pub shown: usize,
    pub all_selected: bool,
    pub some_selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableModel<K> {
    pub headers: Vec<HeaderCell>,
    /// Indices into the input rows, in display order.
    pub rows: Vec<usize>,
    pub row_keys: Vec<K>,
    /// Rows left after filtering, before windowing.
    pub filtered_count: usize,
    pub selection: SelectionSummary,
}

pub struct TableEngine;

impl TableEngine {
    pub fn compute<R: TableRow>(
        rows: &[R],
        columns: &[ColumnDef],
        view: &TableViewState<R::Key>,
        windowing: Windowing,
    ) -> TableModel<R::Key> {
        let headers = Self::headers(columns, view);

        let mut order: Vec<usize> = (0..rows.len())
            .filter(|&i| Self::matches(&rows[i], columns, view))
            .collect();
        let filtered_count = order.len();

        Self::sort(&mut order, rows, columns, view);

        let order: Vec<usize> = match windowing {
            Windowing::Remote => order,
            Windowing::Local {
                page_index,
                page_size,
            } => order
                .into_iter()
                .skip(page_index.saturating_mul(page_size))
                .take(page_size)
                .collect(),
        };

        let row_keys: Vec<R::Key> = order.iter().map(|&i| rows[i].row_key()).collect();
        let selected = row_keys
            .iter()
            .filter(|k| view.row_selection.contains(k))
            .count();
        let shown = row_keys.len();
        let selection = SelectionSummary {
            selected,
            shown,
            all_selected: shown > 0 && selected == shown,
            some_selected: selected > 0 && selected < shown,
        };

        TableModel {
            headers,
            rows: order,
            row_keys,
            filtered_count,
            selection,
        }
    }

    /// Left-pinned columns (pin order), then unpinned (declaration order), then right-pinned.
    fn headers<K: Eq + std::hash::Hash + Clone>(
        columns: &[ColumnDef],
        view: &TableViewState<K>,
    ) -> Vec<HeaderCell> {
        let header = |index: usize, column: &ColumnDef| HeaderCell {
            key: column.key,
            label: column.label,
            sortable: column.sortable,
            hideable: column.hideable,
            sort: view.sort_direction(column.key),
            pinned: view.pinning.side(column.key),
            column: index,
        };
        let pinned = |keys: &[String]| -> Vec<HeaderCell> {
            keys.iter()
                .filter_map(|key| columns.iter().position(|c| c.key == key))
                .filter(|&i| view.is_visible(&columns[i]))
                .map(|i| header(i, &columns[i]))
                .collect()
        };

        let mut headers = pinned(&view.pinning.left);
        headers.extend(
            columns
                .iter()
                .enumerate()
                .filter(|(_, c)| view.pinning.side(c.key).is_none() && view.is_visible(c))
                .map(|(i, c)| header(i, c)),
        );
        headers.extend(pinned(&view.pinning.right));
        headers
    }

    fn matches<R: TableRow>(row: &R, columns: &[ColumnDef], view: &TableViewState<R::Key>) -> bool {
        let search = view.search.trim().to_lowercase();
        if !search.is_empty() {
            let hit = columns
                .iter()
                .filter(|c| c.searchable)
                .any(|c| row.cell(c.key).to_text().to_lowercase().contains(&search));
            if !hit {
                return false;
            }
        }
        view.column_filters
            .iter()
            .all(|filter| filter.matches(&row.cell(&filter.key)))
    }

    fn sort<R: TableRow>(
        order: &mut [usize],
        rows: &[R],
        columns: &[ColumnDef],
        view: &TableViewState<R::Key>,
    ) {
        let specs: Vec<_> = view
            .sorting
            .iter()
            .filter(|s| columns.iter().any(|c| c.key == s.key && c.sortable))
            .collect();
        if specs.is_empty() {
            return;
        }
        // slice::sort_by is stable
        order.sort_by(|&a, &b| {
            for spec in &specs {
                let ord = rows[a].cell(&spec.key).sort_cmp(&rows[b].cell(&spec.key));
                let ord = match spec.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::{product_columns, CellValue};
    use crate::table::view::{ColumnFilter, FilterOp};

    #[derive(Debug, Clone)]
    struct Row {
        id: u32,
        name: &'static str,
        price: f64,
    }

    impl TableRow for Row {
        type Key = u32;

        fn row_key(&self) -> u32 {
            self.id
        }

        fn cell(&self, key: &str) -> CellValue {
            match key {
                "id" => CellValue::Number(f64::from(self.id)),
                "title" => CellValue::Text(self.name.to_string()),
                "price" => CellValue::Number(self.price),
                _ => CellValue::Null,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, name: "Lamp", price: 20.0 },
            Row { id: 2, name: "chair", price: 5.0 },
            Row { id: 3, name: "Desk", price: 20.0 },
            Row { id: 4, name: "Mirror", price: 12.0 },
            Row { id: 5, name: "bed", price: 20.0 },
        ]
    }

    fn keys(model: &TableModel<u32>) -> Vec<u32> {
        model.row_keys.clone()
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let columns = product_columns();
        let mut view = TableViewState::new();
        view.toggle_sort(&columns, "price");
        let asc = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote);
        assert_eq!(keys(&asc), [2, 4, 1, 3, 5]);

        view.toggle_sort(&columns, "price");
        let desc = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote);
        assert_eq!(keys(&desc), [1, 3, 5, 4, 2]);
    }

    #[test]
    fn descending_reverses_distinct_keys_exactly() {
        let columns = product_columns();
        let mut view = TableViewState::new();
        view.toggle_sort(&columns, "title");
        let asc = keys(&TableEngine::compute(&rows(), &columns, &view, Windowing::Remote));
        view.toggle_sort(&columns, "title");
        let mut desc = keys(&TableEngine::compute(&rows(), &columns, &view, Windowing::Remote));
        desc.reverse();
        assert_eq!(asc, desc);
        assert_eq!(asc, [5, 2, 3, 1, 4]);
    }

    #[test]
    fn unsorted_keeps_fetch_order() {
        let columns = product_columns();
        let view = TableViewState::new();
        let model = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote);
        assert_eq!(keys(&model), [1, 2, 3, 4, 5]);
        assert_eq!(model.rows, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn search_and_filters() {
        let columns = product_columns();
        let mut view = TableViewState::new();
        view.set_search("  DE ");
        let model = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote);
        assert_eq!(keys(&model), [3]);

        view.set_search("");
        view.set_filter(ColumnFilter {
            key: "price".into(),
            op: FilterOp::Range { min: Some(12.0), max: Some(20.0) },
        });
        let model = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote);
        assert_eq!(keys(&model), [1, 3, 4, 5]);
        assert_eq!(model.filtered_count, 4);
    }

    #[test]
    fn local_windowing_slices_after_sort() {
        let columns = product_columns();
        let mut view = TableViewState::new();
        view.toggle_sort(&columns, "price");
        let page = Windowing::Local { page_index: 1, page_size: 2 };
        let model = TableEngine::compute(&rows(), &columns, &view, page);
        assert_eq!(keys(&model), [1, 3]);
        assert_eq!(model.filtered_count, 5);

        let past_end = Windowing::Local { page_index: 9, page_size: 2 };
        assert!(TableEngine::compute(&rows(), &columns, &view, past_end).rows.is_empty());
    }

    #[test]
    fn selection_survives_resort() {
        let columns = product_columns();
        let mut view = TableViewState::new();
        view.toggle_row(3);
        view.toggle_row(5);
        let model = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote);
        assert_eq!(model.selection.selected, 2);
        assert!(model.selection.some_selected);

        view.toggle_sort(&columns, "title");
        let model = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote);
        assert_eq!(model.selection.selected, 2);

        view.select_all(model.row_keys.clone());
        let model = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote);
        assert!(model.selection.all_selected);
        assert!(!model.selection.some_selected);
    }

    #[test]
    fn hidden_column_returns_to_its_place() {
        let columns = product_columns();
        let mut view = TableViewState::<u32>::new();
        let before: Vec<_> = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote)
            .headers
            .iter()
            .map(|h| h.key)
            .collect();
        view.toggle_visibility(&columns, "price");
        let hidden = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote);
        assert!(hidden.headers.iter().all(|h| h.key != "price"));
        view.toggle_visibility(&columns, "price");
        let after: Vec<_> = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote)
            .headers
            .iter()
            .map(|h| h.key)
            .collect();
        assert_eq!(before, after);
        assert_eq!(&before[..4], ["id", "title", "description", "price"]);
    }

    #[test]
    fn pinned_columns_lead_and_trail() {
        let columns = product_columns();
        let mut view = TableViewState::<u32>::new();
        view.pin("brand", PinSide::Left);
        view.pin("id", PinSide::Right);
        let headers = TableEngine::compute(&rows(), &columns, &view, Windowing::Remote).headers;
        assert_eq!(headers.first().map(|h| h.key), Some("brand"));
        assert_eq!(headers.last().map(|h| h.key), Some("id"));
        assert_eq!(headers.iter().filter(|h| h.key == "brand").count(), 1);
    }
}
