//! Repository port for task persistence and ordering.

use crate::ordering::domain::{DensityViolation, Position};
use crate::ordering::ledger::LedgerError;
use crate::section::domain::SectionId;
use crate::task::domain::{NewTask, Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Placement (`section_id`, `position`) is mutated exclusively through
/// [`Self::append`], [`Self::move_to`], and [`Self::remove`];
/// [`Self::update`] persists identity fields only.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Appends a new task at the end of its section.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::SectionNotFound`] when the section
    /// does not exist, or [`TaskRepositoryError::Persistence`] when the
    /// insert fails.
    async fn append(&self, task: NewTask) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the section's tasks ordered by position.
    async fn list_by_section(&self, section_id: SectionId) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists changes to name, description, due date, completion, and
    /// timestamps; never touches placement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Moves a task to `position` within `section_id`, which may differ
    /// from the task's current section; both affected sections are
    /// renumbered in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, [`TaskRepositoryError::SectionNotFound`] when the destination
    /// section does not exist, or [`TaskRepositoryError::Conflict`] when
    /// concurrent reordering kept winning for the whole retry budget.
    async fn move_to(
        &self,
        id: TaskId,
        section_id: SectionId,
        position: Position,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Deletes the task and closes the position gap it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn remove(&self, id: TaskId) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The target section was not found.
    #[error("section not found: {0}")]
    SectionNotFound(SectionId),

    /// Concurrent reordering kept colliding; the operation may be retried.
    #[error("task reordering conflicted with concurrent writers")]
    Conflict,

    /// A scope failed its density audit; the transaction was rolled back.
    #[error(transparent)]
    InvariantViolation(#[from] DensityViolation),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Maps a ledger failure for the task addressed by `id`. `section_id`
    /// names the destination scope when the operation targeted one.
    #[must_use]
    pub fn from_ledger(err: LedgerError, id: TaskId, section_id: Option<SectionId>) -> Self {
        match err {
            LedgerError::RecordNotFound => Self::NotFound(id),
            LedgerError::ScopeNotFound => section_id.map_or_else(
                || Self::persistence(io::Error::other("ordering scope disappeared")),
                Self::SectionNotFound,
            ),
            LedgerError::Conflict => Self::Conflict,
            LedgerError::InvariantViolation(violation) => Self::InvariantViolation(violation),
            LedgerError::Storage(source) => Self::Persistence(source),
        }
    }
}
