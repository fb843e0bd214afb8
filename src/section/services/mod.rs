//! Orchestration services for section ordering.

mod ordering;

pub use ordering::{SectionOrderingError, SectionOrderingResult, SectionOrderingService};
