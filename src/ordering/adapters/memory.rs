//! In-memory ordered-container store backing repository test doubles.
//!
//! [`OrderedStore`] implements [`PositionGateway`] directly: repositories
//! wrap it in `Arc<RwLock<..>>` and hold the write guard for one whole
//! operation, which stands in for the relational store's transaction and
//! scope locks.

use crate::ordering::domain::{
    DensitySnapshot, Position, PositionRange, PositionedRecord, ShiftDirection,
};
use crate::ordering::ports::{GatewayError, GatewayResult, PositionGateway};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::io;

/// Generic in-memory store for one family of positioned records.
#[derive(Debug, Clone)]
pub struct OrderedStore<R: PositionedRecord> {
    records: HashMap<R::Id, R>,
    scopes: Option<HashSet<R::Scope>>,
}

impl<R: PositionedRecord> OrderedStore<R> {
    /// Creates a store that accepts records in any scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            scopes: None,
        }
    }

    /// Creates a store that only accepts scopes registered up front,
    /// mirroring a foreign-key constraint on the container.
    #[must_use]
    pub fn with_scope_registry() -> Self {
        Self {
            records: HashMap::new(),
            scopes: Some(HashSet::new()),
        }
    }

    /// Registers `scope` as a valid container.
    pub fn register_scope(&mut self, scope: R::Scope) {
        if let Some(scopes) = self.scopes.as_mut() {
            scopes.insert(scope);
        }
    }

    /// Returns the record with `id`, if present.
    #[must_use]
    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.records.get(&id)
    }

    /// Returns the records of `scope` ordered by position.
    #[must_use]
    pub fn in_scope(&self, scope: R::Scope) -> Vec<R> {
        let mut records: Vec<R> = self
            .records
            .values()
            .filter(|record| record.scope() == scope)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.position());
        records
    }

    /// Overwrites an existing record's stored state, returning `false`
    /// when the record does not exist.
    ///
    /// Callers use this for identity updates only; placement changes go
    /// through the ledger.
    pub fn replace(&mut self, record: &R) -> bool {
        if !self.records.contains_key(&record.id()) {
            return false;
        }
        self.records.insert(record.id(), record.clone());
        true
    }
}

impl<R: PositionedRecord> Default for OrderedStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn vanished() -> GatewayError {
    GatewayError::storage(io::Error::other("record vanished inside the store lock"))
}

impl<R: PositionedRecord> PositionGateway for OrderedStore<R> {
    type Record = R;

    fn lock_scope(&mut self, scope: R::Scope) -> GatewayResult<()> {
        // The caller's write guard is the lock; only scope existence is
        // checked here.
        match self.scopes.as_ref() {
            Some(scopes) if !scopes.contains(&scope) => Err(GatewayError::ScopeNotFound),
            _ => Ok(()),
        }
    }

    fn load(&mut self, id: R::Id) -> GatewayResult<Option<R>> {
        Ok(self.records.get(&id).cloned())
    }

    fn max_position(&mut self, scope: R::Scope) -> GatewayResult<Option<Position>> {
        Ok(self
            .records
            .values()
            .filter(|record| record.scope() == scope)
            .map(PositionedRecord::position)
            .max())
    }

    fn shift(
        &mut self,
        scope: R::Scope,
        range: PositionRange,
        direction: ShiftDirection,
    ) -> GatewayResult<()> {
        for record in self.records.values_mut() {
            if record.scope() == scope && range.contains(record.position()) {
                let value = record.position().get().saturating_add(direction.delta());
                let shifted = Position::new(value).map_err(GatewayError::storage)?;
                record.set_position(shifted);
            }
        }
        Ok(())
    }

    fn place(
        &mut self,
        id: R::Id,
        scope: R::Scope,
        position: Position,
        at: DateTime<Utc>,
    ) -> GatewayResult<R> {
        let record = self.records.get_mut(&id).ok_or_else(vanished)?;
        record.relocate(scope, position, at);
        Ok(record.clone())
    }

    fn insert(&mut self, record: R) -> GatewayResult<R> {
        self.records.insert(record.id(), record.clone());
        Ok(record)
    }

    fn delete(&mut self, id: R::Id) -> GatewayResult<R> {
        self.records.remove(&id).ok_or_else(vanished)
    }

    fn density_snapshot(&mut self, scope: R::Scope) -> GatewayResult<DensitySnapshot> {
        let mut records = 0_i64;
        let mut positions = HashSet::new();
        let mut min_position = 0_i32;
        let mut max_position = 0_i32;
        for record in self.records.values().filter(|r| r.scope() == scope) {
            let value = record.position().get();
            records += 1;
            positions.insert(value);
            min_position = if min_position == 0 {
                value
            } else {
                min_position.min(value)
            };
            max_position = max_position.max(value);
        }
        Ok(DensitySnapshot {
            records,
            distinct_positions: i64::try_from(positions.len()).unwrap_or(i64::MAX),
            min_position,
            max_position,
        })
    }
}
