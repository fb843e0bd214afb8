//! Repository port for section persistence and ordering.

use crate::ordering::domain::{DensityViolation, Position};
use crate::ordering::ledger::LedgerError;
use crate::section::domain::{NewSection, ProjectId, Section, SectionId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for section repository operations.
pub type SectionRepositoryResult<T> = Result<T, SectionRepositoryError>;

/// Section persistence contract.
///
/// Placement (`position`) is mutated exclusively through [`Self::append`],
/// [`Self::move_to`], and [`Self::remove`]; [`Self::update`] persists
/// identity fields only.
#[async_trait]
pub trait SectionRepository: Send + Sync {
    /// Appends a new section at the end of its project.
    ///
    /// # Errors
    ///
    /// Returns [`SectionRepositoryError::Persistence`] when the insert
    /// fails.
    async fn append(&self, section: NewSection) -> SectionRepositoryResult<Section>;

    /// Finds a section by identifier.
    ///
    /// Returns `None` when the section does not exist.
    async fn find_by_id(&self, id: SectionId) -> SectionRepositoryResult<Option<Section>>;

    /// Returns the project's sections ordered by position.
    async fn list_by_project(&self, project_id: ProjectId)
    -> SectionRepositoryResult<Vec<Section>>;

    /// Persists changes to name and timestamps; never touches placement.
    ///
    /// # Errors
    ///
    /// Returns [`SectionRepositoryError::NotFound`] when the section does
    /// not exist.
    async fn update(&self, section: &Section) -> SectionRepositoryResult<()>;

    /// Moves a section to `position` within its project, renumbering the
    /// displaced siblings in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`SectionRepositoryError::NotFound`] when the section does
    /// not exist, or [`SectionRepositoryError::Conflict`] when concurrent
    /// reordering kept winning for the whole retry budget.
    async fn move_to(
        &self,
        id: SectionId,
        position: Position,
        now: DateTime<Utc>,
    ) -> SectionRepositoryResult<Section>;

    /// Deletes the section and closes the position gap it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`SectionRepositoryError::NotFound`] when the section does
    /// not exist.
    async fn remove(&self, id: SectionId) -> SectionRepositoryResult<Section>;
}

/// Errors returned by section repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SectionRepositoryError {
    /// The section was not found.
    #[error("section not found: {0}")]
    NotFound(SectionId),

    /// Concurrent reordering kept colliding; the operation may be retried.
    #[error("section reordering conflicted with concurrent writers")]
    Conflict,

    /// A scope failed its density audit; the transaction was rolled back.
    #[error(transparent)]
    InvariantViolation(#[from] DensityViolation),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SectionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Maps a ledger failure for the section addressed by `id`.
    #[must_use]
    pub fn from_ledger(err: LedgerError, id: SectionId) -> Self {
        match err {
            LedgerError::RecordNotFound => Self::NotFound(id),
            LedgerError::Conflict => Self::Conflict,
            LedgerError::InvariantViolation(violation) => Self::InvariantViolation(violation),
            LedgerError::ScopeNotFound | LedgerError::Storage(_) => Self::persistence(err),
        }
    }
}
