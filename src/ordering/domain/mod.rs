//! Pure domain types for dense sibling ordering.
//!
//! Everything here is IO-free: position scalars and ranges, the
//! positioned-record abstraction, the pure move planner, and the density
//! audit that makes invariant breaches observable instead of letting them
//! silently corrupt data.

mod density;
mod error;
mod plan;
mod position;
mod record;

pub use density::{DensitySnapshot, DensityViolation};
pub use error::OrderingDomainError;
pub use plan::{Destination, MovePlan, Placement, SiblingShift, plan_move};
pub use position::{Position, PositionRange, ShiftDirection};
pub use record::PositionedRecord;
