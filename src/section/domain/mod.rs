//! Domain model for project-scoped sections.
//!
//! Sections are ordered containers of tasks; their placement is managed by
//! the ordering ledger, everything else here is plain aggregate state.

mod error;
mod ids;
mod section;

pub use error::SectionDomainError;
pub use ids::{ProjectId, SectionId};
pub use section::{NewSection, PersistedSectionData, Section, SectionName};
