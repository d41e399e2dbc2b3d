//! `zaoshop-storage` — implementations of the order and catalog ports.
//!
//! Two backends behind the same traits: [`InMemoryStore`] for dev/test and
//! [`PostgresStore`] for persistence.

pub mod catalog_store;
pub mod in_memory;
pub mod postgres;

pub use catalog_store::CatalogStore;
pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

#[cfg(test)]
mod placement_tests;
