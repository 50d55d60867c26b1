//! Crate-level error type.
//!
//! Each layer keeps its own error enum; this one only exists so the binary and the
//! [`CatalogSystem`](crate::session::CatalogSystem) entry points can use `?` across them.

use crate::config::ConfigError;
use crate::forms::{FormError, ValidationErrors};
use crate::session::SessionError;
use catalog_framework::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Invalid product: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, CatalogError>;
