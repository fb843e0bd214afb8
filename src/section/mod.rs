//! Project-scoped section ordering.
//!
//! Sections are the ordered containers of a project's board. Their dense
//! positions are maintained by the ordering ledger; sections never change
//! project, so every move is a same-scope reposition. The module follows
//! hexagonal architecture:
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
