//! Section aggregate and its validated scalar types.

use super::{ProjectId, SectionDomainError, SectionId};
use crate::ordering::domain::{Position, PositionedRecord};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, non-empty section name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionName(String);

impl SectionName {
    /// Creates a validated section name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SectionDomainError::EmptyName`] when the trimmed value is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, SectionDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SectionDomainError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SectionName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Section aggregate: an ordered container of tasks within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    id: SectionId,
    project_id: ProjectId,
    name: SectionName,
    position: Position,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Freshly validated section awaiting its appended position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSection {
    id: SectionId,
    project_id: ProjectId,
    name: SectionName,
    created_at: DateTime<Utc>,
}

impl NewSection {
    /// Creates a section pending insertion at the end of its project.
    #[must_use]
    pub fn new(project_id: ProjectId, name: SectionName, clock: &impl Clock) -> Self {
        Self {
            id: SectionId::new(),
            project_id,
            name,
            created_at: clock.utc(),
        }
    }

    /// Returns the identifier assigned to the pending section.
    #[must_use]
    pub const fn id(&self) -> SectionId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Materializes the section at its appended position.
    #[must_use]
    pub fn into_section(self, position: Position) -> Section {
        Section {
            id: self.id,
            project_id: self.project_id,
            name: self.name,
            position,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Parameter object for reconstructing a persisted section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSectionData {
    /// Persisted section identifier.
    pub id: SectionId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted display name.
    pub name: SectionName,
    /// Persisted position within the project.
    pub position: Position,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Section {
    /// Reconstructs a section from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSectionData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            position: data.position,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the section identifier.
    #[must_use]
    pub const fn id(&self) -> SectionId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &SectionName {
        &self.name
    }

    /// Returns the position within the project.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the section.
    pub fn rename(&mut self, name: SectionName, clock: &impl Clock) {
        self.name = name;
        self.updated_at = clock.utc();
    }
}

impl PositionedRecord for Section {
    type Id = SectionId;
    type Scope = ProjectId;

    fn id(&self) -> SectionId {
        self.id
    }

    fn scope(&self) -> ProjectId {
        self.project_id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn relocate(&mut self, scope: ProjectId, position: Position, at: DateTime<Utc>) {
        self.project_id = scope;
        self.position = position;
        self.updated_at = at;
    }
}
