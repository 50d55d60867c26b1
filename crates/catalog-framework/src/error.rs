//! # Framework Errors
//!
//! Two layers of errors live here:
//! - [`FrameworkError`] for failures of the in-process actor plumbing;
//! - [`RemoteError`], the taxonomy every [`RemoteCollection`](crate::RemoteCollection) speaks,
//!   whether the collection sits behind HTTP or behind an actor channel.

/// Errors that can occur within the actor plumbing itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

/// Failure of a call against a remote collection.
///
/// No variant is fatal: callers surface the message and leave local state untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// No response was received (connection refused, timeout, closed channel).
    #[error("Network failure: {0}")]
    Network(String),

    /// A response arrived with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A response arrived but its body could not be understood.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Human-readable message suitable for a notification.
    pub fn message(&self) -> String {
        match self {
            RemoteError::Network(msg) | RemoteError::Decode(msg) => msg.clone(),
            RemoteError::Http { message, .. } => message.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::Http { status: 404, .. })
    }
}

impl From<FrameworkError> for RemoteError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                RemoteError::Network(e.to_string())
            }
            FrameworkError::NotFound(id) => RemoteError::Http {
                status: 404,
                message: format!("Record with id '{id}' not found"),
            },
            FrameworkError::EntityError(inner) => RemoteError::Http {
                status: 400,
                message: inner.to_string(),
            },
        }
    }
}
