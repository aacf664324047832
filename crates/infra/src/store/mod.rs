//! Product storage boundary.
//!
//! Handlers only see the [`ProductStore`] trait; the in-memory store backs
//! dev/test runs and the Postgres store backs persistent deployments.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError};
