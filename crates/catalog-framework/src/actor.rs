//! # Collection Actor
//!
//! This module defines the `ResourceActor`, an in-memory collection served over a channel. It is
//! the "Server" side of the actor pattern: it owns the records exclusively and processes
//! requests one at a time, so the store needs no locks.
//!
//! The catalog uses it wherever the real remote API is not wanted: offline mode and tests. It
//! reproduces the remote API's paging contract (`skip`/`limit`, authoritative `total`, insertion
//! order) and, with [`WriteMode::Echo`], its habit of answering writes without keeping them.

use crate::client::ResourceClient;
use crate::entity::Entity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::page::Page;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What the actor does with successful writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Writes are stored and visible to later reads.
    #[default]
    Persist,
    /// Writes are validated and answered but the store is left untouched, like the public
    /// mock API. A created record gets the id `total + 1`.
    Echo,
}

/// ## ResourceActor
///
/// Owns the store for entity type `T` and answers [`ResourceRequest<T>`] messages in order.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` (or `with_records()`) returns the actor and its client.
/// 2. **Run**: spawn `actor.run()`.
/// 3. **Use**: call the client; drop every client clone to stop the actor.
///
/// ```rust
/// use catalog_framework::{Entity, ResourceActor};
///
/// #[derive(Clone, Debug)]
/// struct Note { id: u32, text: String }
/// #[derive(Clone, Debug)]
/// struct NotePatch { text: Option<String> }
/// #[derive(Debug, thiserror::Error)]
/// #[error("note error")]
/// struct NoteError;
///
/// impl Entity for Note {
///     type Id = u32;
///     type Draft = String;
///     type Patch = NotePatch;
///     type Error = NoteError;
///
///     fn id(&self) -> &u32 { &self.id }
///     fn from_draft(id: u32, text: String) -> Result<Self, NoteError> { Ok(Self { id, text }) }
///     fn apply_patch(&mut self, patch: NotePatch) -> Result<(), NoteError> {
///         if let Some(text) = patch.text { self.text = text; }
///         Ok(())
///     }
///     fn to_patch(&self) -> NotePatch { NotePatch { text: Some(self.text.clone()) } }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Note>::new(10);
///     tokio::spawn(actor.run());
///
///     let note = client.create("hello".to_string()).await.unwrap();
///     let page = client.list(0, 10).await.unwrap();
///     assert_eq!(page.total, 1);
///     assert_eq!(page.items[0].id, note.id);
/// }
/// ```
///
/// # Operations
///
/// * **List**: returns up to `limit` records starting at `skip`, in insertion order, with the
///   store size as `total`. A `limit` of zero returns every record from `skip` on.
/// * **Get**: a clone of the record, or `None`.
/// * **Create**: assigns the next id, builds the record with `T::from_draft`, stores it.
/// * **Update**: applies the patch with `T::apply_patch` to a copy; on success the copy
///   replaces the stored record and is returned.
/// * **Delete**: removes the record and returns it.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    order: Vec<T::Id>,
    next_id: u32,
    write_mode: WriteMode,
}

impl<T: Entity> ResourceActor<T> {
    /// Creates an empty actor and its client.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::with_records(buffer_size, Vec::new(), WriteMode::Persist)
    }

    /// Creates an actor pre-loaded with `records` (kept in the given order).
    ///
    /// New ids continue after the number of seeded records.
    pub fn with_records(
        buffer_size: usize,
        records: Vec<T>,
        write_mode: WriteMode,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let mut store = HashMap::with_capacity(records.len());
        let mut order = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id().clone();
            if store.insert(id.clone(), record).is_none() {
                order.push(id);
            }
        }
        let next_id = u32::try_from(order.len()).unwrap_or(u32::MAX).saturating_add(1);
        let actor = Self {
            receiver,
            store,
            order,
            next_id,
            write_mode,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "Product" instead of "catalog_admin::model::Product")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, size = self.store.len(), mode = ?self.write_mode, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::List {
                    skip,
                    limit,
                    respond_to,
                } => {
                    let page = self.page(skip, limit);
                    debug!(entity_type, skip, limit, returned = page.items.len(), "List");
                    let _ = respond_to.send(Ok(page));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Create { draft, respond_to } => {
                    debug!(entity_type, ?draft, "Create");
                    let id = match self.write_mode {
                        WriteMode::Persist => {
                            let id = T::Id::from(self.next_id);
                            self.next_id += 1;
                            id
                        }
                        WriteMode::Echo => T::Id::from(self.next_id),
                    };
                    match T::from_draft(id.clone(), draft) {
                        Ok(item) => {
                            if self.write_mode == WriteMode::Persist {
                                self.store.insert(id.clone(), item.clone());
                                self.order.push(id.clone());
                            }
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Update {
                    id,
                    patch,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?patch, "Update");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut updated = current.clone();
                    if let Err(e) = updated.apply_patch(patch) {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if self.write_mode == WriteMode::Persist {
                        self.store.insert(id.clone(), updated.clone());
                    }
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(updated));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let removed = match self.write_mode {
                        WriteMode::Persist => {
                            let removed = self.store.remove(&id);
                            if removed.is_some() {
                                self.order.retain(|existing| existing != &id);
                            }
                            removed
                        }
                        WriteMode::Echo => self.store.get(&id).cloned(),
                    };
                    match removed {
                        Some(item) => {
                            info!(entity_type, %id, size = self.store.len(), "Deleted");
                            let _ = respond_to.send(Ok(item));
                        }
                        None => {
                            warn!(entity_type, %id, "Not found");
                            let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        }
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn page(&self, skip: u64, limit: u64) -> Page<T> {
        let total = self.order.len() as u64;
        let start = usize::try_from(skip).unwrap_or(usize::MAX).min(self.order.len());
        let take = if limit == 0 {
            usize::MAX
        } else {
            usize::try_from(limit).unwrap_or(usize::MAX)
        };
        let items = self.order[start..]
            .iter()
            .take(take)
            .filter_map(|id| self.store.get(id).cloned())
            .collect();
        Page::new(items, total, skip, limit)
    }
}
