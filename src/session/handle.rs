//! # Session Handle
//!
//! The "Client" side of the session actor. Every method sends one [`SessionCommand`] and waits
//! until the actor has applied it; by then the snapshot reflects the command. Remote results
//! arrive later: use [`wait_until`](SessionHandle::wait_until) or
//! [`settled`](SessionHandle::settled) to wait for them.

use super::error::SessionError;
use super::message::{SessionCommand, SessionMessage};
use super::snapshot::SessionSnapshot;
use crate::model::{Product, ProductId};
use crate::table::{ColumnFilter, PinSide, SortDirection};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub fn new(
        sender: mpsc::Sender<SessionMessage>,
        snapshots: watch::Receiver<SessionSnapshot>,
    ) -> Self {
        Self { sender, snapshots }
    }

    /// The latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Waits for a snapshot satisfying `predicate` (checking the current one first).
    pub async fn wait_until(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot, SessionError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| SessionError::Closed)?
            .clone();
        Ok(snapshot)
    }

    /// Waits until no fetch and no write is in flight.
    pub async fn settled(&self) -> Result<SessionSnapshot, SessionError> {
        self.wait_until(SessionSnapshot::is_settled).await
    }

    pub async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        debug!(?command, "Sending command");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SessionMessage::Command {
                command,
                respond_to,
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Dropped)?
    }

    /// Looks up one product (remote call; does not change the session).
    pub async fn show(&self, id: ProductId) -> Result<Product, SessionError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SessionMessage::Show { id, respond_to })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Dropped)?
    }

    // ---- paging ----

    pub async fn refresh(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Refresh).await
    }

    pub async fn set_page(&self, index: usize) -> Result<(), SessionError> {
        self.send(SessionCommand::SetPage(index)).await
    }

    pub async fn next_page(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::NextPage).await
    }

    pub async fn previous_page(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::PreviousPage).await
    }

    pub async fn set_page_size(&self, size: usize) -> Result<(), SessionError> {
        self.send(SessionCommand::SetPageSize(size)).await
    }

    // ---- view ----

    pub async fn toggle_sort(&self, key: &str) -> Result<(), SessionError> {
        self.send(SessionCommand::ToggleSort(key.to_string())).await
    }

    pub async fn add_sort(&self, key: &str, direction: SortDirection) -> Result<(), SessionError> {
        self.send(SessionCommand::AddSort(key.to_string(), direction))
            .await
    }

    pub async fn toggle_column(&self, key: &str) -> Result<(), SessionError> {
        self.send(SessionCommand::ToggleColumn(key.to_string())).await
    }

    pub async fn set_column_visible(&self, key: &str, visible: bool) -> Result<(), SessionError> {
        self.send(SessionCommand::SetColumnVisible(key.to_string(), visible))
            .await
    }

    pub async fn pin(&self, key: &str, side: PinSide) -> Result<(), SessionError> {
        self.send(SessionCommand::Pin(key.to_string(), side)).await
    }

    pub async fn set_search(&self, search: &str) -> Result<(), SessionError> {
        self.send(SessionCommand::SetSearch(search.to_string())).await
    }

    pub async fn set_filter(&self, filter: ColumnFilter) -> Result<(), SessionError> {
        self.send(SessionCommand::SetFilter(filter)).await
    }

    pub async fn toggle_row(&self, id: ProductId) -> Result<(), SessionError> {
        self.send(SessionCommand::ToggleRow(id)).await
    }

    pub async fn select_all(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::SelectAllVisible).await
    }

    // ---- forms ----

    pub async fn open_add_form(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::OpenAddForm).await
    }

    pub async fn set_add_field(&self, field: &str, value: &str) -> Result<(), SessionError> {
        self.send(SessionCommand::SetAddField(field.to_string(), value.to_string()))
            .await
    }

    /// Validates and sends the add form. The create itself completes later.
    pub async fn submit_add(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::SubmitAdd).await
    }

    pub async fn open_edit(&self, id: ProductId) -> Result<(), SessionError> {
        self.send(SessionCommand::OpenEdit(id)).await
    }

    pub async fn set_edit_field(&self, field: &str, value: &str) -> Result<(), SessionError> {
        self.send(SessionCommand::SetEditField(field.to_string(), value.to_string()))
            .await
    }

    pub async fn submit_edit(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::SubmitEdit).await
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), SessionError> {
        self.send(SessionCommand::Delete(id)).await
    }
}
