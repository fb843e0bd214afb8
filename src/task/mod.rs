//! Section-scoped task ordering.
//!
//! Tasks are the ordered entries of a section's board column. Their dense
//! positions are maintained by the ordering ledger, including transfers
//! into a different section, which renumber both the vacated and the
//! entered section atomically. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
