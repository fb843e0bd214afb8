//! Service layer for section-scoped task ordering.

use crate::ordering::domain::{OrderingDomainError, Position};
use crate::section::domain::SectionId;
use crate::task::domain::{NewTask, Task, TaskDomainError, TaskId, TaskName};
use crate::task::ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for creating a task at the end of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    section_id: SectionId,
    name: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(section_id: SectionId, name: impl Into<String>) -> Self {
        Self {
            section_id,
            name: name.into(),
            description: None,
            due_date: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial update for a task; absent fields stay unchanged.
///
/// Placement is never part of an update: repositioning goes through
/// [`TaskOrderingService::move_task`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    name: Option<String>,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    completed: Option<bool>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the task name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Marks the task completed or reopens it.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Service-level errors for task ordering operations.
#[derive(Debug, Error)]
pub enum TaskOrderingError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The requested position is invalid.
    #[error(transparent)]
    Position(#[from] OrderingDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task ordering service operations.
pub type TaskOrderingResult<T> = Result<T, TaskOrderingError>;

/// Task ordering orchestration service.
pub struct TaskOrderingService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskOrderingService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskOrderingService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task ordering service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task at the end of its section.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError`] when name validation fails, the
    /// section does not exist, or the repository rejects persistence.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskOrderingResult<Task> {
        let CreateTaskRequest {
            section_id,
            name,
            description,
            due_date,
        } = request;

        let task_name = TaskName::new(name)?;
        let mut pending = NewTask::new(section_id, task_name, &*self.clock);
        if let Some(text) = description {
            pending = pending.with_description(text);
        }
        if let Some(due) = due_date {
            pending = pending.with_due_date(due);
        }
        Ok(self.repository.append(pending).await?)
    }

    /// Returns the section's tasks ordered front to back.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Repository`] when persistence lookup
    /// fails.
    pub async fn tasks(&self, section_id: SectionId) -> TaskOrderingResult<Vec<Task>> {
        Ok(self.repository.list_by_section(section_id).await?)
    }

    /// Applies a partial update without touching the task's placement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError`] when the task does not exist or a
    /// replacement name fails validation.
    pub async fn update_task(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskOrderingResult<Task> {
        let UpdateTaskRequest {
            name,
            description,
            due_date,
            completed,
        } = request;

        let mut task = self.find_required(id).await?;
        if let Some(raw) = name {
            let task_name = TaskName::new(raw)?;
            task.rename(task_name, &*self.clock);
        }
        if let Some(text) = description {
            task.describe(text, &*self.clock);
        }
        if let Some(due) = due_date {
            task.schedule(due, &*self.clock);
        }
        if let Some(done) = completed {
            task.set_completed(done, &*self.clock);
        }
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Moves a task to `position` within `section_id`, which may differ
    /// from the task's current section.
    ///
    /// Positions past the end of the destination clamp to its last slot
    /// (one past the current extent when changing sections).
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Position`] when `position` is not
    /// positive, or [`TaskOrderingError::Repository`] when the task or the
    /// destination section does not exist, or the move keeps conflicting.
    pub async fn move_task(
        &self,
        id: TaskId,
        section_id: SectionId,
        position: i32,
    ) -> TaskOrderingResult<Task> {
        let target = Position::new(position)?;
        debug!(%id, %section_id, position, "moving task");
        Ok(self
            .repository
            .move_to(id, section_id, target, self.clock.utc())
            .await?)
    }

    /// Deletes a task, closing the position gap it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOrderingError::Repository`] when the task does not
    /// exist.
    pub async fn delete_task(&self, id: TaskId) -> TaskOrderingResult<Task> {
        Ok(self.repository.remove(id).await?)
    }

    async fn find_required(&self, id: TaskId) -> TaskOrderingResult<Task> {
        let found: TaskRepositoryResult<Option<Task>> = self.repository.find_by_id(id).await;
        found?.ok_or_else(|| TaskRepositoryError::NotFound(id).into())
    }
}
