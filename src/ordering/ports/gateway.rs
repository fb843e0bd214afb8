//! Transaction-scoped persistence port driven by the move ledger.

use crate::ordering::domain::{
    DensitySnapshot, Position, PositionRange, PositionedRecord, ShiftDirection,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Identifier type of the records a gateway manages.
pub type IdOf<G> = <<G as PositionGateway>::Record as PositionedRecord>::Id;

/// Scope type of the records a gateway manages.
pub type ScopeOf<G> = <<G as PositionGateway>::Record as PositionedRecord>::Scope;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Persistence primitives the ledger drives within one open transaction.
///
/// An implementation wraps a live transaction handle: every call observes
/// the transaction's snapshot, and the adapter that opened the transaction
/// commits or rolls back all writes as a unit. The ledger acquires
/// exclusive access to each affected scope through [`Self::lock_scope`]
/// before writing, so implementations must make that call keep concurrent
/// movers out for the rest of the transaction (row locks, serializable
/// isolation, or an exclusive in-process guard).
pub trait PositionGateway {
    /// Record family managed by this gateway.
    type Record: PositionedRecord;

    /// Acquires exclusive access to every sibling in `scope` until the
    /// transaction ends.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ScopeNotFound`] when the scope target does
    /// not exist, or [`GatewayError::Conflict`] when lock acquisition
    /// collides with a concurrent writer.
    fn lock_scope(&mut self, scope: ScopeOf<Self>) -> GatewayResult<()>;

    /// Point-reads a record, `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] when the read fails.
    fn load(&mut self, id: IdOf<Self>) -> GatewayResult<Option<Self::Record>>;

    /// Highest occupied position in `scope`, `None` when it is empty.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] when the query fails.
    fn max_position(&mut self, scope: ScopeOf<Self>) -> GatewayResult<Option<Position>>;

    /// Shifts every sibling of `scope` whose position falls in `range` by
    /// one step in `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Conflict`] on a serialization failure or
    /// [`GatewayError::Storage`] when the update fails.
    fn shift(
        &mut self,
        scope: ScopeOf<Self>,
        range: PositionRange,
        direction: ShiftDirection,
    ) -> GatewayResult<()>;

    /// Writes the moved record's final placement and returns the updated
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Conflict`] when the record disappeared under
    /// the move (a concurrent delete won), or [`GatewayError::Storage`]
    /// when the write fails.
    fn place(
        &mut self,
        id: IdOf<Self>,
        scope: ScopeOf<Self>,
        position: Position,
        at: DateTime<Utc>,
    ) -> GatewayResult<Self::Record>;

    /// Inserts a freshly built record at its already-assigned placement.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] when the insert fails.
    fn insert(&mut self, record: Self::Record) -> GatewayResult<Self::Record>;

    /// Deletes a record and returns its last persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Conflict`] when the record disappeared under
    /// the delete, or [`GatewayError::Storage`] when the delete fails.
    fn delete(&mut self, id: IdOf<Self>) -> GatewayResult<Self::Record>;

    /// Audits `scope`'s position usage for the pre-commit density check.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] when the query fails.
    fn density_snapshot(&mut self, scope: ScopeOf<Self>) -> GatewayResult<DensitySnapshot>;
}

/// Errors surfaced by persistence gateways.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The scope target does not exist.
    #[error("destination scope does not exist")]
    ScopeNotFound,

    /// Concurrent writers collided; the enclosing transaction should retry.
    #[error("transaction conflict, safe to retry")]
    Conflict,

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl GatewayError {
    /// Wraps a storage-layer error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
