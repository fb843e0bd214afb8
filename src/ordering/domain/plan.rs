//! Pure planning half of the move algorithm.
//!
//! [`plan_move`] resolves a requested position against the destination
//! scope's current extent and yields the bounded sibling shifts that keep
//! every affected scope dense. It performs no IO; the ledger applies the
//! plan through a persistence gateway inside the enclosing transaction.

use super::{Position, PositionRange, ShiftDirection};

/// Where a move should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<S> {
    /// Stay in the record's current scope.
    CurrentScope,
    /// Land in the given scope, which may equal the current one.
    Scope(S),
}

impl<S: Copy> Destination<S> {
    /// Resolves the destination against the record's current scope.
    #[must_use]
    pub fn resolve(self, current: S) -> S {
        match self {
            Self::CurrentScope => current,
            Self::Scope(scope) => scope,
        }
    }
}

/// Current placement of the record being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<S> {
    /// Scope the record currently belongs to.
    pub scope: S,
    /// Position currently held within that scope.
    pub position: Position,
}

/// One bounded shift of siblings within a single scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingShift<S> {
    /// Scope whose siblings shift.
    pub scope: S,
    /// Positions affected.
    pub range: PositionRange,
    /// Direction the siblings shift.
    pub direction: ShiftDirection,
}

/// Fully resolved move: the shifts to apply and the final placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePlan<S> {
    /// The record already sits at the requested position; write nothing.
    Stay,
    /// Apply the shifts in order, then write the final placement.
    Apply {
        /// Sibling shifts, applied before the placement write.
        shifts: Vec<SiblingShift<S>>,
        /// Scope the record ends up in.
        scope: S,
        /// Position the record ends up at.
        to: Position,
    },
}

/// Resolves one move against the destination scope's current extent.
///
/// `dest_max` is the highest occupied position in the destination scope,
/// `None` when it is empty. Requests past the end clamp to the last
/// reachable slot: `dest_max` for same-scope moves, one past it for
/// cross-scope moves (the mover itself extends the destination by one).
/// "Move beyond the end" therefore means "move to the end", not an error.
#[must_use]
pub fn plan_move<S: Copy + Eq>(
    current: Placement<S>,
    dest_scope: S,
    dest_max: Option<Position>,
    requested: Position,
) -> MovePlan<S> {
    if dest_scope == current.scope {
        // The scope holds the record itself, so it cannot be empty.
        let end = dest_max.unwrap_or(current.position);
        let to = requested.min(end);
        if to == current.position {
            return MovePlan::Stay;
        }
        let shift = if to > current.position {
            SiblingShift {
                scope: dest_scope,
                range: PositionRange::below(current.position.succ(), to.succ()),
                direction: ShiftDirection::Decrement,
            }
        } else {
            SiblingShift {
                scope: dest_scope,
                range: PositionRange::below(to, current.position),
                direction: ShiftDirection::Increment,
            }
        };
        return MovePlan::Apply {
            shifts: vec![shift],
            scope: dest_scope,
            to,
        };
    }

    let to = requested.min(Position::after(dest_max));
    MovePlan::Apply {
        shifts: vec![
            SiblingShift {
                scope: current.scope,
                range: PositionRange::tail(current.position.succ()),
                direction: ShiftDirection::Decrement,
            },
            SiblingShift {
                scope: dest_scope,
                range: PositionRange::tail(to),
                direction: ShiftDirection::Increment,
            },
        ],
        scope: dest_scope,
        to,
    }
}
