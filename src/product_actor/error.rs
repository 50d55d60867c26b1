//! Error types for the Product actor.

use thiserror::Error;

/// Errors raised when a draft or patch would produce an invalid product.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// A required text field is empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A numeric field is negative or not a number.
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidNumber { field: &'static str, value: f64 },
}
