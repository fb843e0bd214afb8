//! Port contracts for the ordering ledger.

mod gateway;

pub use gateway::{GatewayError, GatewayResult, IdOf, PositionGateway, ScopeOf};
