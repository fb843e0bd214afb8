//! Position scalar and range types for dense sibling ordering.

use super::OrderingDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One-based position of a record within its owning scope.
///
/// Positions are dense: between transactions, the live records of a scope
/// always hold exactly `{1..n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(i32);

impl Position {
    /// Front of every scope.
    pub const FIRST: Self = Self(1);

    /// Creates a validated position.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingDomainError::InvalidPosition`] when `value` is
    /// smaller than one.
    pub const fn new(value: i32) -> Result<Self, OrderingDomainError> {
        if value < 1 {
            return Err(OrderingDomainError::InvalidPosition(value));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Position immediately behind this one.
    #[must_use]
    pub const fn succ(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Append position for a scope whose highest occupied position is
    /// `max` (`None` when the scope is empty).
    #[must_use]
    pub fn after(max: Option<Self>) -> Self {
        max.map_or(Self::FIRST, Self::succ)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half-open run of sibling positions within one scope: `start <= p < end`.
///
/// An absent end bound reaches to the back of the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRange {
    start: Position,
    end: Option<Position>,
}

impl PositionRange {
    /// Range covering `start <= p < end`.
    #[must_use]
    pub const fn below(start: Position, end: Position) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Range covering every position from `start` to the back of the scope.
    #[must_use]
    pub const fn tail(start: Position) -> Self {
        Self { start, end: None }
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn start(self) -> Position {
        self.start
    }

    /// Exclusive upper bound, absent when the range is open-ended.
    #[must_use]
    pub const fn end(self) -> Option<Position> {
        self.end
    }

    /// Whether `position` falls inside the range.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        position >= self.start && self.end.is_none_or(|end| position < end)
    }
}

/// Direction siblings shift by one step to keep a scope dense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Positions grow by one, opening a slot.
    Increment,
    /// Positions shrink by one, closing a gap.
    Decrement,
}

impl ShiftDirection {
    /// Signed single-step delta applied to affected positions.
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}
