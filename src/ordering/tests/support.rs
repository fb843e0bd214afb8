//! Shared fixtures for ordering tests: a minimal positioned record and
//! gateway wrappers that observe or perturb ledger execution.

use crate::ordering::adapters::memory::OrderedStore;
use crate::ordering::domain::{
    DensitySnapshot, Destination, Position, PositionRange, PositionedRecord, ShiftDirection,
};
use crate::ordering::ledger::{LedgerResult, execute_move};
use crate::ordering::ports::{GatewayError, GatewayResult, PositionGateway};
use chrono::{DateTime, Utc};

/// Minimal positioned record: a card in a numbered column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: u32,
    pub column: u8,
    pub position: Position,
    pub updated_at: DateTime<Utc>,
}

impl PositionedRecord for Card {
    type Id = u32;
    type Scope = u8;

    fn id(&self) -> u32 {
        self.id
    }

    fn scope(&self) -> u8 {
        self.column
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn relocate(&mut self, scope: u8, position: Position, at: DateTime<Utc>) {
        self.column = scope;
        self.position = position;
        self.updated_at = at;
    }
}

pub fn ts() -> DateTime<Utc> {
    Utc::now()
}

pub fn pos(value: i32) -> Position {
    Position::new(value).expect("test positions are positive")
}

/// Builds a store holding the given columns, each filled front to back
/// with the listed card ids.
pub fn seeded(columns: &[(u8, &[u32])]) -> OrderedStore<Card> {
    let mut store = OrderedStore::new();
    for (column, ids) in columns {
        for (index, id) in ids.iter().enumerate() {
            let position = pos(i32::try_from(index + 1).expect("small test scopes"));
            store
                .insert(Card {
                    id: *id,
                    column: *column,
                    position,
                    updated_at: ts(),
                })
                .expect("in-memory insert cannot fail");
        }
    }
    store
}

/// Card ids of `column` ordered by position.
pub fn order_of(store: &OrderedStore<Card>, column: u8) -> Vec<u32> {
    store
        .in_scope(column)
        .iter()
        .map(|card| card.id)
        .collect()
}

/// Gateway wrapper counting write operations, for no-op verification.
pub struct CountingGateway {
    pub store: OrderedStore<Card>,
    pub shifts: usize,
    pub places: usize,
}

impl CountingGateway {
    pub fn new(store: OrderedStore<Card>) -> Self {
        Self {
            store,
            shifts: 0,
            places: 0,
        }
    }
}

impl PositionGateway for CountingGateway {
    type Record = Card;

    fn lock_scope(&mut self, scope: u8) -> GatewayResult<()> {
        self.store.lock_scope(scope)
    }

    fn load(&mut self, id: u32) -> GatewayResult<Option<Card>> {
        self.store.load(id)
    }

    fn max_position(&mut self, scope: u8) -> GatewayResult<Option<Position>> {
        self.store.max_position(scope)
    }

    fn shift(
        &mut self,
        scope: u8,
        range: PositionRange,
        direction: ShiftDirection,
    ) -> GatewayResult<()> {
        self.shifts += 1;
        self.store.shift(scope, range, direction)
    }

    fn place(
        &mut self,
        id: u32,
        scope: u8,
        position: Position,
        at: DateTime<Utc>,
    ) -> GatewayResult<Card> {
        self.places += 1;
        self.store.place(id, scope, position, at)
    }

    fn insert(&mut self, record: Card) -> GatewayResult<Card> {
        self.store.insert(record)
    }

    fn delete(&mut self, id: u32) -> GatewayResult<Card> {
        self.store.delete(id)
    }

    fn density_snapshot(&mut self, scope: u8) -> GatewayResult<DensitySnapshot> {
        self.store.density_snapshot(scope)
    }
}

/// A competing move fired from inside the first scope-lock acquisition,
/// simulating a writer that slips in between the peek and the locks.
pub enum Ambush {
    /// Relocate the card into another column.
    RelocateAcross { id: u32, dest: u8 },
    /// Reposition the card within its current column.
    RepositionWithin { id: u32, to: Position },
}

/// Gateway wrapper that executes a queued [`Ambush`] before the first
/// scope lock succeeds.
pub struct AmbushGateway {
    pub store: OrderedStore<Card>,
    ambush: Option<Ambush>,
}

impl AmbushGateway {
    pub fn new(store: OrderedStore<Card>, ambush: Ambush) -> Self {
        Self {
            store,
            ambush: Some(ambush),
        }
    }

    fn spring(&mut self) -> LedgerResult<()> {
        if let Some(ambush) = self.ambush.take() {
            match ambush {
                Ambush::RelocateAcross { id, dest } => {
                    execute_move(
                        &mut self.store,
                        id,
                        Destination::Scope(dest),
                        Position::FIRST,
                        ts(),
                    )?;
                }
                Ambush::RepositionWithin { id, to } => {
                    execute_move(&mut self.store, id, Destination::CurrentScope, to, ts())?;
                }
            }
        }
        Ok(())
    }
}

impl PositionGateway for AmbushGateway {
    type Record = Card;

    fn lock_scope(&mut self, scope: u8) -> GatewayResult<()> {
        self.spring().map_err(GatewayError::storage)?;
        self.store.lock_scope(scope)
    }

    fn load(&mut self, id: u32) -> GatewayResult<Option<Card>> {
        self.store.load(id)
    }

    fn max_position(&mut self, scope: u8) -> GatewayResult<Option<Position>> {
        self.store.max_position(scope)
    }

    fn shift(
        &mut self,
        scope: u8,
        range: PositionRange,
        direction: ShiftDirection,
    ) -> GatewayResult<()> {
        self.store.shift(scope, range, direction)
    }

    fn place(
        &mut self,
        id: u32,
        scope: u8,
        position: Position,
        at: DateTime<Utc>,
    ) -> GatewayResult<Card> {
        self.store.place(id, scope, position, at)
    }

    fn insert(&mut self, record: Card) -> GatewayResult<Card> {
        self.store.insert(record)
    }

    fn delete(&mut self, id: u32) -> GatewayResult<Card> {
        self.store.delete(id)
    }

    fn density_snapshot(&mut self, scope: u8) -> GatewayResult<DensitySnapshot> {
        self.store.density_snapshot(scope)
    }
}
