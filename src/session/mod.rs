//! # Catalog Session
//!
//! The catalog screen as an actor: [`CatalogSession`] owns all screen state, [`SessionHandle`]
//! sends it commands and reads its [`SessionSnapshot`]s, and [`CatalogSystem`] wires it to a
//! product source and shuts it down.

mod actor;
mod error;
mod handle;
mod message;
mod snapshot;
mod system;

pub use actor::CatalogSession;
pub use error::SessionError;
pub use handle::SessionHandle;
pub use message::{SessionCommand, SessionMessage};
pub use snapshot::{FetchStatus, Notification, NotificationKind, SessionSnapshot};
pub use system::{CatalogSystem, OFFLINE_PRODUCTS};
