//! Error types for the catalog session.

use crate::forms::FormError;
use crate::model::ProductId;
use catalog_framework::RemoteError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The session actor has stopped.
    #[error("Session is closed")]
    Closed,

    /// The session actor dropped the reply channel.
    #[error("Session dropped the request")]
    Dropped,

    /// The command was understood but not allowed (e.g. an invalid page size).
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Product {0} is not on the current page")]
    NotOnPage(ProductId),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Session task failed: {0}")]
    TaskFailed(String),
}
