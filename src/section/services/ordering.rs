//! Service layer for project-scoped section ordering.

use crate::ordering::domain::{OrderingDomainError, Position};
use crate::section::domain::{NewSection, ProjectId, Section, SectionDomainError, SectionId, SectionName};
use crate::section::ports::{SectionRepository, SectionRepositoryError, SectionRepositoryResult};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for section ordering operations.
#[derive(Debug, Error)]
pub enum SectionOrderingError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SectionDomainError),

    /// The requested position is invalid.
    #[error(transparent)]
    Position(#[from] OrderingDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] SectionRepositoryError),
}

/// Result type for section ordering service operations.
pub type SectionOrderingResult<T> = Result<T, SectionOrderingError>;

/// Section ordering orchestration service.
pub struct SectionOrderingService<R, C>
where
    R: SectionRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for SectionOrderingService<R, C>
where
    R: SectionRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> SectionOrderingService<R, C>
where
    R: SectionRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new section ordering service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a section at the end of the project.
    ///
    /// # Errors
    ///
    /// Returns [`SectionOrderingError`] when name validation fails or the
    /// repository rejects persistence.
    pub async fn create_section(
        &self,
        project_id: ProjectId,
        name: &str,
    ) -> SectionOrderingResult<Section> {
        let section_name = SectionName::new(name)?;
        let section = NewSection::new(project_id, section_name, &*self.clock);
        Ok(self.repository.append(section).await?)
    }

    /// Returns the project's sections ordered front to back.
    ///
    /// # Errors
    ///
    /// Returns [`SectionOrderingError::Repository`] when persistence lookup
    /// fails.
    pub async fn sections(&self, project_id: ProjectId) -> SectionOrderingResult<Vec<Section>> {
        Ok(self.repository.list_by_project(project_id).await?)
    }

    /// Renames a section without touching its placement.
    ///
    /// # Errors
    ///
    /// Returns [`SectionOrderingError`] when name validation fails or the
    /// section does not exist.
    pub async fn rename_section(
        &self,
        id: SectionId,
        name: &str,
    ) -> SectionOrderingResult<Section> {
        let section_name = SectionName::new(name)?;
        let mut section = self.find_required(id).await?;
        section.rename(section_name, &*self.clock);
        self.repository.update(&section).await?;
        Ok(section)
    }

    /// Moves a section to `position` within its project.
    ///
    /// Positions past the end of the project clamp to the last slot.
    ///
    /// # Errors
    ///
    /// Returns [`SectionOrderingError::Position`] when `position` is not
    /// positive, or [`SectionOrderingError::Repository`] when the section
    /// does not exist or the move keeps conflicting.
    pub async fn move_section(
        &self,
        id: SectionId,
        position: i32,
    ) -> SectionOrderingResult<Section> {
        let target = Position::new(position)?;
        debug!(%id, position, "moving section");
        Ok(self.repository.move_to(id, target, self.clock.utc()).await?)
    }

    /// Deletes a section, closing the position gap it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`SectionOrderingError::Repository`] when the section does
    /// not exist.
    pub async fn delete_section(&self, id: SectionId) -> SectionOrderingResult<Section> {
        Ok(self.repository.remove(id).await?)
    }

    async fn find_required(&self, id: SectionId) -> SectionOrderingResult<Section> {
        let found: SectionRepositoryResult<Option<Section>> =
            self.repository.find_by_id(id).await;
        found?.ok_or_else(|| SectionRepositoryError::NotFound(id).into())
    }
}
