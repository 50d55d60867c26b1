//! Generic data table: paging state, column model, view state, the engine that turns rows into
//! a display model, and a plain-text renderer.
//!
//! Apart from the [`product_columns`] declaration, nothing in here knows about products; a row
//! type only needs [`TableRow`].

pub mod column;
pub mod engine;
pub mod pagination;
pub mod render;
pub mod view;

pub use column::{
    product_columns, BadgeRule, Cell, CellValue, ColumnDef, ColumnKind, FormatterRegistry,
    TableRow, Tone,
};
pub use engine::{HeaderCell, SelectionSummary, TableEngine, TableModel, Windowing};
pub use pagination::PaginationStore;
pub use render::{BodyState, FooterModel, TableRenderer};
pub use view::{
    ColumnFilter, ColumnPinning, FilterOp, PinSide, SortDirection, SortSpec, TableViewState,
};
