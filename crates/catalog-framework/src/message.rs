//! # Generic Messages
//!
//! This module defines the message types exchanged between a [`ResourceClient`](crate::ResourceClient)
//! and a [`ResourceActor`](crate::ResourceActor).

use crate::entity::Entity;
use crate::error::FrameworkError;
use crate::page::Page;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to a collection actor.
///
/// The variants mirror the five calls of the remote product API: a paged list, a single
/// lookup, and create/update/delete. Create, update and delete answer with the record as the
/// server saw it (update answers with the echoed fields as a patch in
/// [`RemoteCollection`](crate::RemoteCollection), the actor itself returns the full record).
#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    List {
        skip: u64,
        limit: u64,
        respond_to: Response<Page<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Create {
        draft: T::Draft,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
}
