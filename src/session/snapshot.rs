//! What the session looks like after each message, published over a `watch` channel.

use crate::forms::{FormState, ProductFormValues};
use crate::model::{Product, ProductId};
use crate::table::{
    BodyState, ColumnDef, FooterModel, SelectionSummary, TableModel, TableRenderer,
    TableViewState,
};
use catalog_framework::RemoteError;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Failed(RemoteError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Bumped on every publish.
    pub revision: u64,
    pub columns: Arc<Vec<ColumnDef>>,
    /// The current page as cached, in fetch order.
    pub rows: Vec<Product>,
    pub view: TableViewState<ProductId>,
    pub model: TableModel<ProductId>,
    pub body: BodyState,
    pub footer: FooterModel,
    pub page_index: usize,
    pub page_size: usize,
    pub total: Option<u64>,
    pub status: FetchStatus,
    /// Creates, updates and deletes sent but not yet answered.
    pub pending_writes: usize,
    pub notifications: Vec<Notification>,
    pub add_form: FormState<ProductFormValues>,
    pub edit_form: FormState<ProductFormValues>,
    pub editing: Option<ProductId>,
}

impl SessionSnapshot {
    /// The state before the session has published anything.
    pub fn empty() -> Self {
        Self {
            revision: 0,
            columns: Arc::new(Vec::new()),
            rows: Vec::new(),
            view: TableViewState::default(),
            model: TableModel {
                headers: Vec::new(),
                rows: Vec::new(),
                row_keys: Vec::new(),
                filtered_count: 0,
                selection: SelectionSummary::default(),
            },
            body: BodyState::Loading,
            footer: FooterModel {
                label: String::new(),
                page_size: 0,
                size_options: Vec::new(),
                can_previous: false,
                can_next: false,
            },
            page_index: 0,
            page_size: 0,
            total: None,
            status: FetchStatus::Idle,
            pending_writes: 0,
            notifications: Vec::new(),
            add_form: FormState::Closed,
            edit_form: FormState::Closed,
            editing: None,
        }
    }

    /// No fetch and no write in flight.
    pub fn is_settled(&self) -> bool {
        self.status != FetchStatus::Loading && self.pending_writes == 0
    }

    /// Rows in display order (filtered, sorted).
    pub fn visible_rows(&self) -> impl Iterator<Item = &Product> {
        self.model.rows.iter().map(|&i| &self.rows[i])
    }

    pub fn visible_ids(&self) -> Vec<ProductId> {
        self.model.row_keys.clone()
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn render(&self, renderer: &TableRenderer) -> String {
        renderer.render(
            &self.rows,
            &self.columns,
            &self.view,
            &self.model,
            &self.body,
            &self.footer,
        )
    }
}
