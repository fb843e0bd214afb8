//! Port contracts for section persistence.

mod repository;

pub use repository::{SectionRepository, SectionRepositoryError, SectionRepositoryResult};
