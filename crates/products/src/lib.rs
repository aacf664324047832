//! Products domain module.
//!
//! This crate contains the product record, its validation rules, the
//! filter/sort query and the inventory report, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod number;
pub mod product;
pub mod query;
pub mod report;

pub use product::{NewProduct, Product, ProductId, ProductInput, ProductPatch};
pub use query::{ProductQuery, SortField, SortOrder, SortSpec};
pub use report::{InventoryReport, ProductValuation};
