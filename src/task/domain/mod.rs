//! Domain model for section-scoped tasks.
//!
//! Tasks are the ordered entries of a section. Their placement, including
//! cross-section transfer, is managed by the ordering ledger; everything
//! else here is plain aggregate state.

mod error;
mod ids;
mod task;

pub use error::TaskDomainError;
pub use ids::TaskId;
pub use task::{NewTask, PersistedTaskData, Task, TaskName};
