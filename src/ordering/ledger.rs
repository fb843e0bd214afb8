//! Transactional algorithms that keep sibling positions dense.
//!
//! One generic routine serves both ordered containers (sections within a
//! project, tasks within a section): [`execute_move`] covers reposition
//! within a scope and transfer across scopes, [`execute_append`] the
//! append-only creation rule, and [`execute_removal`] the gap-closing
//! delete. Each runs inside a transaction opened by the calling adapter:
//! the gateway wraps the live transaction handle, the caller commits on
//! `Ok` and rolls back on `Err`, so partial renumbering is never
//! persisted.

use crate::ordering::domain::{
    DensityViolation, Destination, MovePlan, Placement, Position, PositionRange, PositionedRecord,
    ShiftDirection, plan_move,
};
use crate::ordering::ports::{GatewayError, IdOf, PositionGateway, ScopeOf};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors produced by the ledger.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The record to operate on does not exist.
    #[error("record does not exist")]
    RecordNotFound,

    /// The destination scope does not exist.
    #[error("destination scope does not exist")]
    ScopeNotFound,

    /// Concurrent reordering collided with this operation.
    #[error("transaction conflict, safe to retry")]
    Conflict,

    /// A scope failed the density audit; the transaction must abort.
    #[error(transparent)]
    InvariantViolation(#[from] DensityViolation),

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl From<GatewayError> for LedgerError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::ScopeNotFound => Self::ScopeNotFound,
            GatewayError::Conflict => Self::Conflict,
            GatewayError::Storage(source) => Self::Storage(source),
        }
    }
}

/// Outcome of a committed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome<R> {
    record: R,
    repositioned: bool,
}

impl<R> MoveOutcome<R> {
    const fn unchanged(record: R) -> Self {
        Self {
            record,
            repositioned: false,
        }
    }

    const fn applied(record: R) -> Self {
        Self {
            record,
            repositioned: true,
        }
    }

    /// The record in its post-move state.
    #[must_use]
    pub const fn record(&self) -> &R {
        &self.record
    }

    /// Consumes the outcome, yielding the record.
    #[must_use]
    pub fn into_record(self) -> R {
        self.record
    }

    /// Whether any write was performed (`false` for the no-op case).
    #[must_use]
    pub const fn was_repositioned(&self) -> bool {
        self.repositioned
    }
}

/// Moves one record to `requested`, within or across scopes.
///
/// The record is peeked first to learn its scope, the affected scopes are
/// locked in ascending order, and the record is re-read under the locks so
/// a concurrent mover cannot make the plan operate on stale placement.
///
/// # Errors
///
/// Returns [`LedgerError::RecordNotFound`] when the record is missing,
/// [`LedgerError::ScopeNotFound`] when the destination scope does not
/// exist, [`LedgerError::Conflict`] when a concurrent mover relocated the
/// record between the peek and the scope locks, and
/// [`LedgerError::InvariantViolation`] when an affected scope fails the
/// pre-commit density audit.
pub fn execute_move<G: PositionGateway>(
    gateway: &mut G,
    id: IdOf<G>,
    destination: Destination<ScopeOf<G>>,
    requested: Position,
    now: DateTime<Utc>,
) -> LedgerResult<MoveOutcome<G::Record>> {
    let peeked = gateway.load(id)?.ok_or(LedgerError::RecordNotFound)?;
    let source_scope = peeked.scope();
    let dest_scope = destination.resolve(source_scope);
    lock_scope_pair(gateway, source_scope, dest_scope)?;

    // Authoritative re-read now that the scopes are locked.
    let record = gateway.load(id)?.ok_or(LedgerError::RecordNotFound)?;
    if record.scope() != source_scope {
        // A concurrent mover relocated the record first; the locks cover
        // the wrong scope, so the caller must retry.
        return Err(LedgerError::Conflict);
    }

    let current = Placement {
        scope: source_scope,
        position: record.position(),
    };
    let dest_max = gateway.max_position(dest_scope)?;
    debug!(
        from = current.position.get(),
        last = dest_max.map_or(0, Position::get),
        requested = requested.get(),
        "planning move"
    );

    match plan_move(current, dest_scope, dest_max, requested) {
        MovePlan::Stay => {
            debug!("record already at requested position, nothing to write");
            Ok(MoveOutcome::unchanged(record))
        }
        MovePlan::Apply { shifts, scope, to } => {
            for shift in &shifts {
                gateway.shift(shift.scope, shift.range, shift.direction)?;
            }
            let updated = gateway.place(id, scope, to, now)?;
            verify_density(gateway, source_scope)?;
            if scope != source_scope {
                verify_density(gateway, scope)?;
            }
            Ok(MoveOutcome::applied(updated))
        }
    }
}

/// Appends a freshly created record at the end of `scope`.
///
/// `build` receives the assigned position and must return a record whose
/// placement is `scope` at exactly that position.
///
/// # Errors
///
/// Returns [`LedgerError::ScopeNotFound`] when the scope does not exist,
/// and [`LedgerError::InvariantViolation`] when the scope fails the
/// post-insert density audit.
pub fn execute_append<G, F>(gateway: &mut G, scope: ScopeOf<G>, build: F) -> LedgerResult<G::Record>
where
    G: PositionGateway,
    F: FnOnce(Position) -> G::Record,
{
    gateway.lock_scope(scope)?;
    let position = Position::after(gateway.max_position(scope)?);
    debug!(position = position.get(), "appending record at end of scope");
    let record = gateway.insert(build(position))?;
    verify_density(gateway, scope)?;
    Ok(record)
}

/// Deletes a record and closes the position gap it leaves behind.
///
/// # Errors
///
/// Returns [`LedgerError::RecordNotFound`] when the record is missing,
/// [`LedgerError::Conflict`] when a concurrent mover relocated it between
/// the peek and the scope lock, and [`LedgerError::InvariantViolation`]
/// when the scope fails the post-delete density audit.
pub fn execute_removal<G: PositionGateway>(
    gateway: &mut G,
    id: IdOf<G>,
) -> LedgerResult<G::Record> {
    let peeked = gateway.load(id)?.ok_or(LedgerError::RecordNotFound)?;
    let scope = peeked.scope();
    gateway.lock_scope(scope)?;

    let record = gateway.load(id)?.ok_or(LedgerError::RecordNotFound)?;
    if record.scope() != scope {
        return Err(LedgerError::Conflict);
    }

    let removed = gateway.delete(id)?;
    gateway.shift(
        scope,
        PositionRange::tail(record.position().succ()),
        ShiftDirection::Decrement,
    )?;
    verify_density(gateway, scope)?;
    Ok(removed)
}

/// Locks one or two scopes in ascending order so concurrent cross-scope
/// movers cannot deadlock against each other.
fn lock_scope_pair<G: PositionGateway>(
    gateway: &mut G,
    source: ScopeOf<G>,
    dest: ScopeOf<G>,
) -> LedgerResult<()> {
    if source == dest {
        gateway.lock_scope(source)?;
    } else if source < dest {
        gateway.lock_scope(source)?;
        gateway.lock_scope(dest)?;
    } else {
        gateway.lock_scope(dest)?;
        gateway.lock_scope(source)?;
    }
    Ok(())
}

fn verify_density<G: PositionGateway>(gateway: &mut G, scope: ScopeOf<G>) -> LedgerResult<()> {
    let snapshot = gateway.density_snapshot(scope)?;
    snapshot.verify()?;
    Ok(())
}
