//! In-memory task repository for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::sync::{Arc, RwLock};

use crate::ordering::adapters::memory::OrderedStore;
use crate::ordering::domain::{Destination, Position};
use crate::ordering::ledger::{MoveOutcome, execute_append, execute_move, execute_removal};
use crate::section::domain::SectionId;
use crate::task::domain::{NewTask, Task, TaskId};
use crate::task::ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};

/// Thread-safe in-memory task repository.
///
/// Sections must be registered before tasks can live in them, mirroring
/// the foreign-key constraint of the relational store. One write guard is
/// held for each whole operation, standing in for its transaction.
#[derive(Debug, Clone)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<OrderedStore<Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository with no known sections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(OrderedStore::with_scope_registry())),
        }
    }

    /// Registers `section_id` as a valid task container.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the store lock is
    /// poisoned.
    pub fn register_section(&self, section_id: SectionId) -> TaskRepositoryResult<()> {
        let mut store = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        store.register_scope(section_id);
        Ok(())
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn append(&self, task: NewTask) -> TaskRepositoryResult<Task> {
        let id = task.id();
        let scope = task.section_id();
        let mut store = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        execute_append(&mut *store, scope, |position| task.into_task(position))
            .map_err(|err| TaskRepositoryError::from_ledger(err, id, Some(scope)))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let store = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        Ok(store.get(id).cloned())
    }

    async fn list_by_section(&self, section_id: SectionId) -> TaskRepositoryResult<Vec<Task>> {
        let store = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        Ok(store.in_scope(section_id))
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut store = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        if store.replace(task) {
            Ok(())
        } else {
            Err(TaskRepositoryError::NotFound(task.id()))
        }
    }

    async fn move_to(
        &self,
        id: TaskId,
        section_id: SectionId,
        position: Position,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let mut store = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        execute_move(&mut *store, id, Destination::Scope(section_id), position, now)
            .map(MoveOutcome::into_record)
            .map_err(|err| TaskRepositoryError::from_ledger(err, id, Some(section_id)))
    }

    async fn remove(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        let mut store = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        execute_removal(&mut *store, id)
            .map_err(|err| TaskRepositoryError::from_ledger(err, id, None))
    }
}
