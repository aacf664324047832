//! Infrastructure layer: product storage backends.

pub mod store;

pub use store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
