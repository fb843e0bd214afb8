//! Shared Diesel plumbing for `PostgreSQL` ordered-container repositories.
//!
//! Scope locks are explicit `SELECT .. FOR UPDATE` over the scope's rows,
//! which under READ COMMITTED gives the pessimistic serialization the
//! concurrency contract requires. Serialization failures and deadlocks
//! surface as [`GatewayError::Conflict`] and the repositories retry the
//! whole transaction a bounded number of times before giving up. The
//! `(scope, position)` uniqueness constraints are expected to be declared
//! `DEFERRABLE INITIALLY DEFERRED` so the intermediate states of a range
//! shift never trip them.

use crate::ordering::domain::DensitySnapshot;
use crate::ordering::ledger::LedgerError;
use crate::ordering::ports::GatewayError;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Connection pool shared by the `PostgreSQL` repositories.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Transaction attempts per operation before a conflict is surfaced.
pub const MAX_MOVE_ATTEMPTS: u32 = 3;

/// Retries `run` on transaction conflicts, up to `attempts` times.
///
/// # Errors
///
/// Returns the first non-conflict error unchanged, or
/// [`LedgerError::Conflict`] once the attempts are exhausted.
pub fn retry_on_conflict<T>(
    attempts: u32,
    mut run: impl FnMut() -> Result<T, LedgerError>,
) -> Result<T, LedgerError> {
    for _ in 0..attempts {
        match run() {
            Err(LedgerError::Conflict) => {}
            other => return other,
        }
    }
    Err(LedgerError::Conflict)
}

/// Maps a Diesel error onto the gateway error space.
#[must_use]
pub fn map_diesel_error(err: DieselError) -> GatewayError {
    if let DieselError::DatabaseError(kind, info) = &err {
        let deadlocked = info.message().contains("deadlock");
        if matches!(kind, DatabaseErrorKind::SerializationFailure) || deadlocked {
            return GatewayError::Conflict;
        }
    }
    GatewayError::storage(err)
}

impl From<DieselError> for LedgerError {
    fn from(err: DieselError) -> Self {
        map_diesel_error(err).into()
    }
}

/// Row shape for `SELECT id .. FOR UPDATE` scope locks.
#[derive(Debug, QueryableByName)]
pub struct LockedIdRow {
    /// Identifier of the locked row.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
}

/// Row shape for scope density audits.
#[derive(Debug, QueryableByName)]
pub struct DensityRow {
    /// Number of live records in the scope.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub records: i64,
    /// Number of distinct positions held.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub distinct_positions: i64,
    /// Smallest position held, zero when the scope is empty.
    #[diesel(sql_type = diesel::sql_types::Integer)]
    pub min_position: i32,
    /// Largest position held, zero when the scope is empty.
    #[diesel(sql_type = diesel::sql_types::Integer)]
    pub max_position: i32,
}

impl DensityRow {
    /// Converts the row into a domain snapshot.
    #[must_use]
    pub const fn into_snapshot(self) -> DensitySnapshot {
        DensitySnapshot {
            records: self.records,
            distinct_positions: self.distinct_positions,
            min_position: self.min_position,
            max_position: self.max_position,
        }
    }
}
