//! Density audit types for the gapless-ordering invariant.

use thiserror::Error;

/// Snapshot of one scope's position usage, taken inside a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensitySnapshot {
    /// Number of live records in the scope.
    pub records: i64,
    /// Number of distinct positions held.
    pub distinct_positions: i64,
    /// Smallest position held, zero when the scope is empty.
    pub min_position: i32,
    /// Largest position held, zero when the scope is empty.
    pub max_position: i32,
}

impl DensitySnapshot {
    /// Checks that the scope's positions form exactly `{1..n}`.
    ///
    /// # Errors
    ///
    /// Returns a [`DensityViolation`] describing the mismatch.
    pub fn verify(self) -> Result<(), DensityViolation> {
        let dense = self.records == self.distinct_positions
            && i64::from(self.max_position) == self.records
            && (self.records == 0 || self.min_position == 1);
        if dense {
            Ok(())
        } else {
            Err(DensityViolation { snapshot: self })
        }
    }
}

/// Breach of the dense-ordering invariant detected before commit.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error(
    "dense ordering violated: {} records hold {} distinct positions spanning {}..{}",
    .snapshot.records,
    .snapshot.distinct_positions,
    .snapshot.min_position,
    .snapshot.max_position
)]
pub struct DensityViolation {
    /// The failing audit.
    pub snapshot: DensitySnapshot,
}
