//! Positioned-record abstraction shared by every ordered container.

use super::Position;
use chrono::{DateTime, Utc};
use std::fmt::Debug;
use std::hash::Hash;

/// Record carrying a dense position within an owning scope.
///
/// The ledger reads placement through this trait and adapters write it back
/// when an append, move, or removal commits. Placement must not be mutated
/// through any other path; identity updates leave it untouched.
pub trait PositionedRecord: Clone + Send {
    /// Stable record identifier.
    type Id: Copy + Eq + Hash + Debug + Send;

    /// Identifier of the immediate container.
    type Scope: Copy + Eq + Ord + Hash + Debug + Send;

    /// Returns the record identifier.
    fn id(&self) -> Self::Id;

    /// Returns the owning scope.
    fn scope(&self) -> Self::Scope;

    /// Returns the current position within the scope.
    fn position(&self) -> Position;

    /// Rewrites only the position, as part of a sibling shift.
    fn set_position(&mut self, position: Position);

    /// Moves the record into `scope` at `position`, touching its update
    /// timestamp.
    fn relocate(&mut self, scope: Self::Scope, position: Position, at: DateTime<Utc>);
}
