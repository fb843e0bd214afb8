//! `PostgreSQL` adapter for section persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresSectionRepository;
