//! Error types for section domain validation.

use thiserror::Error;

/// Errors returned while constructing section domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SectionDomainError {
    /// The section name is empty after trimming.
    #[error("section name must not be empty")]
    EmptyName,
}
