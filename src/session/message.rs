//! Messages understood by the session actor.
//!
//! [`SessionCommand`]s come from [`SessionHandle`](super::SessionHandle)s. [`Completion`]s are
//! posted by the tasks the actor spawns for remote calls; they arrive on a separate channel so
//! the actor still stops when the last handle is dropped.

use super::error::SessionError;
use crate::cache::QueryKey;
use crate::model::{Product, ProductId, ProductPatch};
use crate::table::{ColumnFilter, PinSide, SortDirection};
use catalog_framework::{Page, RemoteError};
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

/// A user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Refetch the current page (also the retry after a failed fetch).
    Refresh,
    SetPage(usize),
    NextPage,
    PreviousPage,
    SetPageSize(usize),

    ToggleSort(String),
    AddSort(String, SortDirection),
    ClearSort,
    ToggleColumn(String),
    SetColumnVisible(String, bool),
    Pin(String, PinSide),
    Unpin(String),
    SetSearch(String),
    SetFilter(ColumnFilter),
    RemoveFilter(String),

    ToggleRow(ProductId),
    SelectAllVisible,
    ClearSelection,

    OpenAddForm,
    /// Set one add-form field from text input.
    SetAddField(String, String),
    SubmitAdd,
    CloseAddForm,

    OpenEdit(ProductId),
    SetEditField(String, String),
    SubmitEdit,
    CloseEdit,

    Delete(ProductId),
    DismissNotification(u64),
}

#[derive(Debug)]
pub enum SessionMessage {
    Command {
        command: SessionCommand,
        respond_to: Reply<()>,
    },
    /// Detail lookup; answered directly, no state changes.
    Show {
        id: ProductId,
        respond_to: Reply<Product>,
    },
}

/// Result of a remote call started by the actor.
#[derive(Debug)]
pub enum Completion {
    Fetched {
        ticket: u64,
        key: QueryKey,
        result: Result<Page<Product>, RemoteError>,
    },
    Created(Result<Product, RemoteError>),
    Updated {
        id: ProductId,
        result: Result<ProductPatch, RemoteError>,
    },
    Deleted {
        id: ProductId,
        result: Result<Product, RemoteError>,
    },
}
