//! # Session Actor
//!
//! `CatalogSession` is the single writer for everything the catalog screen shows: paging, the
//! page cache, table view state, the add and edit forms, fetch status and notifications. It
//! handles one message at a time and publishes a [`SessionSnapshot`] after each.
//!
//! ## Remote calls
//!
//! The actor never awaits the network. Each remote call runs in a spawned task that posts a
//! [`Completion`] back to the actor, so the screen stays interactive while requests are in
//! flight.
//!
//! ## Stale responses
//!
//! Every page fetch gets a ticket from a monotonically increasing counter. Only the response
//! carrying the latest ticket for the current [`QueryKey`] is applied. A superseded response for
//! another key is kept in the cache under that key if nothing is cached there yet; it never
//! touches what is shown.
//!
//! ## Optimistic writes
//!
//! Successful creates, updates and deletes patch the cached current page instead of
//! refetching it. The patched page stays authoritative until the user navigates.

use super::error::SessionError;
use super::message::{Completion, Reply, SessionCommand, SessionMessage};
use super::snapshot::{FetchStatus, Notification, NotificationKind, SessionSnapshot};
use crate::cache::{
    merge_updated, prepend_created, remove_deleted, CachedPage, PageCache, QueryCache, QueryKey,
};
use crate::clients::ProductClient;
use crate::config::AppConfig;
use crate::forms::{FormError, FormState, ModalState, ProductFormValues};
use crate::model::{Product, ProductId, ProductPatch};
use crate::table::{
    BodyState, ColumnDef, FooterModel, PaginationStore, TableEngine, TableViewState, Windowing,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn, Instrument};

pub struct CatalogSession {
    commands: mpsc::Receiver<SessionMessage>,
    completions: mpsc::Receiver<Completion>,
    completion_tx: mpsc::Sender<Completion>,
    snapshots: watch::Sender<SessionSnapshot>,

    client: ProductClient,
    columns: Arc<Vec<ColumnDef>>,
    pages: PaginationStore,
    cache: PageCache<Product>,
    view: TableViewState<ProductId>,
    add_form: FormState<ProductFormValues>,
    edit_form: FormState<ProductFormValues>,
    modal: ModalState<ProductId>,
    status: FetchStatus,
    in_flight: Option<(u64, QueryKey)>,
    next_ticket: u64,
    pending_writes: usize,
    notifications: VecDeque<Notification>,
    max_notifications: usize,
    next_notification: u64,
    revision: u64,
}

impl CatalogSession {
    /// Creates the actor, the sender for its commands, and the receiver for its snapshots.
    pub fn new(
        config: &AppConfig,
        client: ProductClient,
        columns: Vec<ColumnDef>,
    ) -> (
        Self,
        mpsc::Sender<SessionMessage>,
        watch::Receiver<SessionSnapshot>,
    ) {
        let capacity = config.session.channel_capacity.max(1);
        let (command_tx, commands) = mpsc::channel(capacity);
        let (completion_tx, completions) = mpsc::channel(capacity);
        let (snapshots, receiver) = watch::channel(SessionSnapshot::empty());

        let mut session = Self {
            commands,
            completions,
            completion_tx,
            snapshots,
            client,
            columns: Arc::new(columns),
            pages: PaginationStore::new(
                config.table.page_sizes.clone(),
                config.table.default_page_size,
            ),
            cache: PageCache::new(config.session.cache_entries),
            view: TableViewState::new(),
            add_form: FormState::Closed,
            edit_form: FormState::Closed,
            modal: ModalState::default(),
            // `run` starts the first fetch before handling anything
            status: FetchStatus::Loading,
            in_flight: None,
            next_ticket: 0,
            pending_writes: 0,
            notifications: VecDeque::new(),
            max_notifications: config.session.max_notifications.max(1),
            next_notification: 0,
            revision: 0,
        };
        session.publish();
        (session, command_tx, receiver)
    }

    /// Fetches the first page, then processes messages until every handle is dropped.
    pub async fn run(mut self) {
        info!(
            page_size = self.pages.page_size(),
            "Session started"
        );
        self.fetch_current();
        self.publish();

        loop {
            tokio::select! {
                message = self.commands.recv() => match message {
                    Some(message) => self.handle_message(message),
                    None => break,
                },
                Some(completion) = self.completions.recv() => {
                    self.handle_completion(completion);
                    self.publish();
                }
            }
        }

        info!("Session stopped");
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Command {
                command,
                respond_to,
            } => {
                debug!(?command, "Handling command");
                let result = self.handle_command(command);
                if let Err(e) = &result {
                    debug!(error = %e, "Command failed");
                }
                // Publish before replying so the caller sees the new state.
                self.publish();
                let _ = respond_to.send(result);
            }
            SessionMessage::Show { id, respond_to } => self.show(id, respond_to),
        }
    }

    fn handle_command(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        let columns = Arc::clone(&self.columns);
        let rejected = |what: &str, key: &str| SessionError::Rejected(format!("{what} {key:?}"));
        match command {
            SessionCommand::Refresh => self.fetch_current(),
            SessionCommand::SetPage(index) => {
                let changed = self.pages.set_page(index);
                self.navigated(changed);
            }
            SessionCommand::NextPage => {
                if self.pages.can_next() {
                    let changed = self.pages.set_page(self.pages.page_index() + 1);
                    self.navigated(changed);
                }
            }
            SessionCommand::PreviousPage => {
                if self.pages.can_previous() {
                    let changed = self.pages.set_page(self.pages.page_index() - 1);
                    self.navigated(changed);
                }
            }
            SessionCommand::SetPageSize(size) => {
                if !self.pages.set_per_page(size) {
                    return Err(SessionError::Rejected(format!(
                        "page size {size} is not one of {:?}",
                        self.pages.allowed_sizes()
                    )));
                }
                self.navigated(true);
            }
            SessionCommand::ToggleSort(key) => {
                if !self.view.toggle_sort(&columns, &key) {
                    return Err(rejected("not a sortable column:", &key));
                }
            }
            SessionCommand::AddSort(key, direction) => {
                if !self.view.add_sort(&columns, &key, direction) {
                    return Err(rejected("not a sortable column:", &key));
                }
            }
            SessionCommand::ClearSort => self.view.clear_sort(),
            SessionCommand::ToggleColumn(key) => {
                if !self.view.toggle_visibility(&columns, &key) {
                    return Err(rejected("not a hideable column:", &key));
                }
            }
            SessionCommand::SetColumnVisible(key, visible) => {
                if !self.view.set_visibility(&columns, &key, visible) {
                    return Err(rejected("not a hideable column:", &key));
                }
            }
            SessionCommand::Pin(key, side) => {
                if !columns.iter().any(|c| c.key == key) {
                    return Err(rejected("unknown column:", &key));
                }
                self.view.pin(&key, side);
            }
            SessionCommand::Unpin(key) => self.view.unpin(&key),
            SessionCommand::SetSearch(search) => self.view.set_search(search),
            SessionCommand::SetFilter(filter) => self.view.set_filter(filter),
            SessionCommand::RemoveFilter(key) => self.view.remove_filter(&key),
            SessionCommand::ToggleRow(id) => {
                if !self.rows().iter().any(|p| p.id == id) {
                    return Err(SessionError::NotOnPage(id));
                }
                self.view.toggle_row(id);
            }
            SessionCommand::SelectAllVisible => {
                let visible = self.model_keys();
                self.view.select_all(visible);
            }
            SessionCommand::ClearSelection => self.view.clear_selection(),

            SessionCommand::OpenAddForm => self.add_form.open(ProductFormValues::default())?,
            SessionCommand::SetAddField(field, raw) => {
                let mut outcome = Ok(());
                self.add_form.edit(|values| outcome = values.assign(&field, &raw))?;
                outcome.map_err(FormError::Invalid)?;
            }
            SessionCommand::SubmitAdd => {
                let draft = self.add_form.submit(ProductFormValues::validate)?;
                self.spawn_write("create", {
                    let client = self.client.clone();
                    async move { Completion::Created(client.create(draft).await) }
                });
            }
            SessionCommand::CloseAddForm => self.add_form.close()?,

            SessionCommand::OpenEdit(id) => {
                let product = self
                    .rows()
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .ok_or(SessionError::NotOnPage(id))?;
                self.edit_form
                    .open(ProductFormValues::from_product(&product))?;
                self.modal.open(id);
            }
            SessionCommand::SetEditField(field, raw) => {
                let mut outcome = Ok(());
                self.edit_form.edit(|values| outcome = values.assign(&field, &raw))?;
                outcome.map_err(FormError::Invalid)?;
            }
            SessionCommand::SubmitEdit => {
                let Some(&id) = self.modal.target() else {
                    return Err(FormError::InvalidTransition {
                        action: "submit",
                        state: self.edit_form.name(),
                    }
                    .into());
                };
                let draft = self.edit_form.submit(ProductFormValues::validate)?;
                let patch = ProductPatch::from(draft);
                self.spawn_write("update", {
                    let client = self.client.clone();
                    async move {
                        let result = client.update(id, patch).await;
                        Completion::Updated { id, result }
                    }
                });
            }
            SessionCommand::CloseEdit => {
                self.edit_form.close()?;
                self.modal.close();
            }

            SessionCommand::Delete(id) => {
                self.spawn_write("delete", {
                    let client = self.client.clone();
                    async move {
                        let result = client.delete(id).await;
                        Completion::Deleted { id, result }
                    }
                });
            }
            SessionCommand::DismissNotification(id) => self.notifications.retain(|n| n.id != id),
        }
        Ok(())
    }

    fn show(&self, id: ProductId, respond_to: Reply<Product>) {
        let client = self.client.clone();
        tokio::spawn(
            async move {
                let result = client.get(id).await.map_err(SessionError::from);
                let _ = respond_to.send(result);
            }
            .instrument(tracing::info_span!("show", %id)),
        );
    }

    /// Page index or size changed (or was re-confirmed): selection does not carry over.
    fn navigated(&mut self, changed: bool) {
        if !changed {
            return;
        }
        self.view.clear_selection();
        self.fetch_current();
    }

    // =========================================================================
    // REMOTE CALLS
    // =========================================================================

    fn current_key(&self) -> QueryKey {
        QueryKey::products(self.pages.page_index(), self.pages.page_size())
    }

    fn fetch_current(&mut self) {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let key = self.current_key();
        self.in_flight = Some((ticket, key));
        self.status = FetchStatus::Loading;

        let client = self.client.clone();
        let tx = self.completion_tx.clone();
        let (skip, limit) = (self.pages.skip(), self.pages.limit());
        let span = tracing::info_span!(
            "fetch",
            ticket,
            page_index = key.page_index,
            page_size = key.page_size
        );
        tokio::spawn(
            async move {
                let result = client.list(skip, limit).await;
                if tx.send(Completion::Fetched { ticket, key, result }).await.is_err() {
                    debug!("Session gone before fetch completed");
                }
            }
            .instrument(span),
        );
    }

    fn spawn_write<F>(&mut self, operation: &'static str, call: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.pending_writes += 1;
        let tx = self.completion_tx.clone();
        tokio::spawn(
            async move {
                if tx.send(call.await).await.is_err() {
                    debug!("Session gone before write completed");
                }
            }
            .instrument(tracing::info_span!("write", operation)),
        );
    }

    // =========================================================================
    // COMPLETIONS
    // =========================================================================

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Fetched {
                ticket,
                key,
                result,
            } => self.fetched(ticket, key, result),
            Completion::Created(result) => {
                self.pending_writes = self.pending_writes.saturating_sub(1);
                self.created(result);
            }
            Completion::Updated { id, result } => {
                self.pending_writes = self.pending_writes.saturating_sub(1);
                self.updated(id, result);
            }
            Completion::Deleted { id, result } => {
                self.pending_writes = self.pending_writes.saturating_sub(1);
                self.deleted(id, result);
            }
        }
    }

    fn fetched(
        &mut self,
        ticket: u64,
        key: QueryKey,
        result: Result<catalog_framework::Page<Product>, catalog_framework::RemoteError>,
    ) {
        let current_key = self.current_key();
        if self.in_flight != Some((ticket, key)) || key != current_key {
            debug!(ticket, ?key, "Ignoring stale response");
            if let Ok(page) = result {
                if key != current_key && self.cache.get(&key).is_none() {
                    self.cache.set(key, |_| Some(CachedPage::from(page)));
                }
            }
            return;
        }

        self.in_flight = None;
        match result {
            Ok(page) => {
                info!(ticket, rows = page.items.len(), total = page.total, "Page loaded");
                self.pages.set_total_count(page.total);
                self.cache.set(key, |_| Some(CachedPage::from(page)));
                self.status = FetchStatus::Idle;
            }
            Err(e) => {
                warn!(ticket, error = %e, "Page fetch failed");
                self.status = FetchStatus::Failed(e);
            }
        }
    }

    fn created(&mut self, result: Result<Product, catalog_framework::RemoteError>) {
        match result {
            Ok(product) => {
                let key = self.current_key();
                let total = self.pages.total_count().unwrap_or(0) + 1;
                self.cache.set(key, |page| {
                    let mut page = page.unwrap_or_else(|| CachedPage {
                        items: Vec::new(),
                        total: total - 1,
                        fetched_at: chrono::Utc::now(),
                    });
                    prepend_created(&mut page, product);
                    Some(page)
                });
                self.pages.set_total_count(total);
                self.complete(|s| s.add_form.succeed());
                self.notify(NotificationKind::Success, "Product added");
            }
            Err(e) => {
                self.complete(|s| s.add_form.fail(e.message()));
                self.notify(NotificationKind::Error, format!("Error adding product: {e}"));
            }
        }
    }

    fn updated(&mut self, id: ProductId, result: Result<ProductPatch, catalog_framework::RemoteError>) {
        match result {
            Ok(echoed) => {
                let key = self.current_key();
                let mut merged = false;
                self.cache.set(key, |page| {
                    let mut page = page?;
                    merged = merge_updated(&mut page, &id, echoed);
                    Some(page)
                });
                if !merged {
                    debug!(%id, "Updated product is not on the current page");
                }
                self.complete(|s| s.edit_form.succeed());
                self.modal.close();
                self.notify(NotificationKind::Success, "Product updated");
            }
            Err(e) => {
                self.complete(|s| s.edit_form.fail(e.message()));
                self.notify(NotificationKind::Error, format!("Error updating product: {e}"));
            }
        }
    }

    fn deleted(&mut self, id: ProductId, result: Result<Product, catalog_framework::RemoteError>) {
        if let Err(e) = result {
            self.notify(NotificationKind::Error, format!("Error deleting product: {e}"));
            return;
        }

        let key = self.current_key();
        let mut removed = false;
        let mut now_empty = false;
        self.cache.set(key, |page| {
            let mut page = page?;
            removed = remove_deleted(&mut page, &id);
            now_empty = page.items.is_empty();
            Some(page)
        });
        if removed {
            let total = self.pages.total_count().unwrap_or(1).saturating_sub(1);
            self.pages.set_total_count(total);
        }
        self.view.row_selection.remove(&id);
        if self.modal.target() == Some(&id) && !self.edit_form.is_submitting() {
            let _ = self.edit_form.close();
            self.modal.close();
        }
        self.notify(NotificationKind::Success, "Product deleted");

        if removed && now_empty && self.pages.page_index() > 0 {
            info!(page_index = self.pages.page_index(), "Page emptied; stepping back");
            let previous = self.pages.page_index() - 1;
            let changed = self.pages.set_page(previous);
            self.navigated(changed);
        }
    }

    /// Applies a form transition that is expected to be legal after a write completes.
    fn complete(&mut self, transition: impl FnOnce(&mut Self) -> Result<(), FormError>) {
        if let Err(e) = transition(self) {
            warn!(error = %e, "Form was not waiting for this result");
        }
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.next_notification += 1;
        let notification = Notification {
            id: self.next_notification,
            kind,
            message: message.into(),
        };
        match kind {
            NotificationKind::Success => info!(message = %notification.message, "Notification"),
            NotificationKind::Error => warn!(message = %notification.message, "Notification"),
        }
        self.notifications.push_back(notification);
        while self.notifications.len() > self.max_notifications {
            self.notifications.pop_front();
        }
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    fn rows(&self) -> &[Product] {
        self.cache
            .get(&self.current_key())
            .map(|page| page.items.as_slice())
            .unwrap_or(&[])
    }

    fn model_keys(&self) -> Vec<ProductId> {
        TableEngine::compute(self.rows(), &self.columns, &self.view, Windowing::Remote).row_keys
    }

    fn snapshot(&self) -> SessionSnapshot {
        let rows = self.rows().to_vec();
        let model = TableEngine::compute(&rows, &self.columns, &self.view, Windowing::Remote);
        let body = match &self.status {
            FetchStatus::Failed(e) => BodyState::Error {
                message: e.message(),
            },
            FetchStatus::Loading if rows.is_empty() => BodyState::Loading,
            _ if model.rows.is_empty() => BodyState::Empty,
            _ => BodyState::Rows,
        };
        SessionSnapshot {
            revision: self.revision,
            columns: Arc::clone(&self.columns),
            footer: FooterModel::new(&self.pages, rows.len()),
            rows,
            view: self.view.clone(),
            model,
            body,
            page_index: self.pages.page_index(),
            page_size: self.pages.page_size(),
            total: self.pages.total_count(),
            status: self.status.clone(),
            pending_writes: self.pending_writes,
            notifications: self.notifications.iter().cloned().collect(),
            add_form: self.add_form.clone(),
            edit_form: self.edit_form.clone(),
            editing: self.modal.target().copied(),
        }
    }

    fn publish(&mut self) {
        self.revision += 1;
        let snapshot = self.snapshot();
        self.snapshots.send_replace(snapshot);
    }
}
