use std::sync::Arc;

use thiserror::Error;

use stockroom_core::DomainError;
use stockroom_products::{InventoryReport, NewProduct, Product, ProductId, ProductPatch, ProductQuery};

/// Product store operation error.
///
/// These are storage-side failures; validation of client input happens in the
/// products crate before a store is called. `Domain` carries record-level
/// validation that can only run against the stored row (update re-validation).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique index on `name` rejected the write.
    #[error("a product named {0:?} already exists")]
    Duplicate(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Connection, query or decoding failure in the backend.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Product collection.
///
/// Natural order (no sort requested) is insertion order. Each method is one
/// storage round-trip; nothing spans multiple writes.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Products matching the filter, sorted as requested.
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError>;

    /// Store a validated product under a freshly generated id.
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Apply a patch to an existing product. `Ok(None)` when the id is unknown.
    async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Option<Product>, StoreError>;

    /// Remove a product, returning it. `Ok(None)` when the id is unknown.
    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Stock totals over the whole collection.
    async fn inventory_report(&self) -> Result<InventoryReport, StoreError> {
        let products = self.list(&ProductQuery::all()).await?;
        Ok(InventoryReport::from_products(&products))
    }
}

#[async_trait::async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        (**self).list(query).await
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).insert(product).await
    }

    async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Option<Product>, StoreError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).delete(id).await
    }

    async fn inventory_report(&self) -> Result<InventoryReport, StoreError> {
        (**self).inventory_report().await
    }
}
