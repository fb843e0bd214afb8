//! In-memory section repository for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::sync::{Arc, RwLock};

use crate::ordering::adapters::memory::OrderedStore;
use crate::ordering::domain::{Destination, Position};
use crate::ordering::ledger::{MoveOutcome, execute_append, execute_move, execute_removal};
use crate::section::domain::{NewSection, ProjectId, Section, SectionId};
use crate::section::ports::{SectionRepository, SectionRepositoryError, SectionRepositoryResult};

/// Thread-safe in-memory section repository.
///
/// One write guard is held for each whole operation, standing in for the
/// relational store's transaction.
#[derive(Debug, Clone, Default)]
pub struct InMemorySectionRepository {
    state: Arc<RwLock<OrderedStore<Section>>>,
}

impl InMemorySectionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SectionRepository for InMemorySectionRepository {
    async fn append(&self, section: NewSection) -> SectionRepositoryResult<Section> {
        let id = section.id();
        let scope = section.project_id();
        let mut store = self.state.write().map_err(|err| {
            SectionRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        execute_append(&mut *store, scope, |position| section.into_section(position))
            .map_err(|err| SectionRepositoryError::from_ledger(err, id))
    }

    async fn find_by_id(&self, id: SectionId) -> SectionRepositoryResult<Option<Section>> {
        let store = self.state.read().map_err(|err| {
            SectionRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        Ok(store.get(id).cloned())
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
    ) -> SectionRepositoryResult<Vec<Section>> {
        let store = self.state.read().map_err(|err| {
            SectionRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        Ok(store.in_scope(project_id))
    }

    async fn update(&self, section: &Section) -> SectionRepositoryResult<()> {
        let mut store = self.state.write().map_err(|err| {
            SectionRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        if store.replace(section) {
            Ok(())
        } else {
            Err(SectionRepositoryError::NotFound(section.id()))
        }
    }

    async fn move_to(
        &self,
        id: SectionId,
        position: Position,
        now: DateTime<Utc>,
    ) -> SectionRepositoryResult<Section> {
        let mut store = self.state.write().map_err(|err| {
            SectionRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        execute_move(&mut *store, id, Destination::CurrentScope, position, now)
            .map(MoveOutcome::into_record)
            .map_err(|err| SectionRepositoryError::from_ledger(err, id))
    }

    async fn remove(&self, id: SectionId) -> SectionRepositoryResult<Section> {
        let mut store = self.state.write().map_err(|err| {
            SectionRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        execute_removal(&mut *store, id)
            .map_err(|err| SectionRepositoryError::from_ledger(err, id))
    }
}
