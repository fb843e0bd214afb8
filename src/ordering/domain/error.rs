//! Validation errors for ordering domain values.

use thiserror::Error;

/// Errors raised while constructing ordering domain values.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum OrderingDomainError {
    /// The position is not a positive integer.
    #[error("invalid position {0}, expected an integer of at least 1")]
    InvalidPosition(i32),
}
