//! # Table Presentation
//!
//! Turns a [`TableModel`] into plain text: toolbar, header, body and footer. The renderer reads
//! display text from the [`FormatterRegistry`]; it never changes the rows.

use super::column::{Cell, ColumnDef, FormatterRegistry, TableRow};
use super::engine::TableModel;
use super::pagination::PaginationStore;
use super::view::{SortDirection, TableViewState};
use std::hash::Hash;

const MAX_CELL_WIDTH: usize = 32;

/// What the body shows instead of, or as, rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyState {
    Loading,
    /// Fetch failed; the user may retry.
    Error { message: String },
    Empty,
    Rows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterModel {
    pub label: String,
    pub page_size: usize,
    pub size_options: Vec<usize>,
    pub can_previous: bool,
    pub can_next: bool,
}

impl FooterModel {
    pub fn new(store: &PaginationStore, rows_on_page: usize) -> Self {
        Self {
            label: store.window_label(rows_on_page),
            page_size: store.page_size(),
            size_options: store.allowed_sizes().to_vec(),
            can_previous: store.can_previous(),
            can_next: store.can_next(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableRenderer {
    registry: FormatterRegistry,
}

impl TableRenderer {
    pub fn new(registry: FormatterRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FormatterRegistry {
        &self.registry
    }

    /// Search box and the column menu (`[x]` shown, `[ ]` hidden; fixed columns are not listed).
    pub fn toolbar<K: Eq + Hash + Clone>(
        &self,
        columns: &[ColumnDef],
        view: &TableViewState<K>,
    ) -> String {
        let menu: Vec<String> = columns
            .iter()
            .filter(|c| c.hideable)
            .map(|c| {
                let mark = if view.is_visible(c) { "x" } else { " " };
                format!("[{mark}] {}", c.label)
            })
            .collect();
        format!("Search: [{}]\nColumns: {}", view.search, menu.join("  "))
    }

    /// Display cells for the model's rows, one inner vector per row in header order.
    pub fn cells<R: TableRow>(
        &self,
        rows: &[R],
        columns: &[ColumnDef],
        model: &TableModel<R::Key>,
    ) -> Vec<Vec<Cell>> {
        model
            .rows
            .iter()
            .map(|&row| {
                model
                    .headers
                    .iter()
                    .map(|h| {
                        let column = &columns[h.column];
                        self.registry.format(&column.kind, &rows[row].cell(column.key))
                    })
                    .collect()
            })
            .collect()
    }

    pub fn footer(&self, footer: &FooterModel) -> String {
        let sizes: Vec<String> = footer.size_options.iter().map(|s| s.to_string()).collect();
        let previous = if footer.can_previous { "< Prev" } else { "-" };
        let next = if footer.can_next { "Next >" } else { "-" };
        format!(
            "{}    Rows per page: {} ({})    {} {}",
            footer.label,
            footer.page_size,
            sizes.join("/"),
            previous,
            next
        )
    }

    /// The full table as text.
    pub fn render<R: TableRow>(
        &self,
        rows: &[R],
        columns: &[ColumnDef],
        view: &TableViewState<R::Key>,
        model: &TableModel<R::Key>,
        body: &BodyState,
        footer: &FooterModel,
    ) -> String {
        let mut header: Vec<String> = vec!["[ ]".to_string()];
        header.extend(model.headers.iter().map(|h| match h.sort {
            Some(SortDirection::Asc) => format!("{} ▲", h.label),
            Some(SortDirection::Desc) => format!("{} ▼", h.label),
            None => h.label.to_string(),
        }));
        if model.selection.all_selected {
            header[0] = "[x]".to_string();
        } else if model.selection.some_selected {
            header[0] = "[-]".to_string();
        }

        let body_rows: Vec<Vec<String>> = match body {
            BodyState::Rows => self
                .cells(rows, columns, model)
                .into_iter()
                .zip(&model.row_keys)
                .map(|(cells, key)| {
                    let mark = if view.is_selected(key) { "[x]" } else { "[ ]" };
                    std::iter::once(mark.to_string())
                        .chain(cells.into_iter().map(|c| truncate(&c.text)))
                        .collect()
                })
                .collect(),
            _ => Vec::new(),
        };

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &body_rows {
            for (width, text) in widths.iter_mut().zip(row) {
                *width = (*width).max(text.chars().count());
            }
        }

        let mut out = Vec::new();
        out.push(self.toolbar(columns, view));
        out.push(join_padded(&header, &widths));
        out.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        match body {
            BodyState::Loading => out.push("Loading...".to_string()),
            BodyState::Error { message } => {
                out.push(format!("Error: {message}. Retry to load the page again."))
            }
            BodyState::Empty => out.push("No results.".to_string()),
            BodyState::Rows if body_rows.is_empty() => out.push("No results.".to_string()),
            BodyState::Rows => out.extend(body_rows.iter().map(|r| join_padded(r, &widths))),
        }
        out.push(self.footer(footer));
        out.join("\n")
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(text, width)| {
            let pad = width.saturating_sub(text.chars().count());
            format!("{text}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
