//! Orchestration services for task ordering.

mod ordering;

pub use ordering::{
    CreateTaskRequest, TaskOrderingError, TaskOrderingResult, TaskOrderingService,
    UpdateTaskRequest,
};
