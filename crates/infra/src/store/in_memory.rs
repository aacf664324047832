use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockroom_products::{NewProduct, Product, ProductId, ProductPatch, ProductQuery};

use super::r#trait::{ProductStore, StoreError};

/// In-memory product store for tests/dev.
///
/// Products live in a `Vec` so iteration order is insertion order. The name
/// uniqueness check and the write happen under one write lock.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Product>>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("product store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Product>>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("product store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let products = self.read()?.clone();
        Ok(query.apply(products))
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut products = self.write()?;
        if products.iter().any(|p| p.name() == product.name) {
            return Err(StoreError::Duplicate(product.name));
        }

        let stored = Product::new(ProductId::new(), product);
        products.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Option<Product>, StoreError> {
        let mut products = self.write()?;
        let Some(idx) = products.iter().position(|p| p.id() == id) else {
            return Ok(None);
        };

        let mut updated = products[idx].clone();
        updated.apply(patch)?;

        if products
            .iter()
            .any(|p| p.id() != id && p.name() == updated.name())
        {
            return Err(StoreError::Duplicate(updated.name().to_string()));
        }

        products[idx] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let mut products = self.write()?;
        Ok(products
            .iter()
            .position(|p| p.id() == id)
            .map(|idx| products.remove(idx)))
    }
}
