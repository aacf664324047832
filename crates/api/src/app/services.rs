//! Application context: storage handle + view registry.
//!
//! Built once at startup and shared with every handler through an axum
//! `Extension`.

use std::sync::Arc;

use thiserror::Error;

use stockroom_infra::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};

use crate::app::views::{ViewError, Views};
use crate::config::{ApiConfig, StorageConfig};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("storage initialisation failed: {0}")]
    Store(#[from] StoreError),

    #[error("view initialisation failed: {0}")]
    Views(#[from] ViewError),
}

#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn ProductStore>,
    views: Arc<Views>,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>) -> Result<Self, ViewError> {
        Ok(Self {
            store,
            views: Arc::new(Views::new()?),
        })
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Result<Self, ViewError> {
        Self::new(Arc::new(InMemoryProductStore::new()))
    }

    pub fn store(&self) -> &dyn ProductStore {
        self.store.as_ref()
    }

    pub fn views(&self) -> &Views {
        &self.views
    }
}

/// Wire services according to the configured storage backend.
pub async fn build_services(config: &ApiConfig) -> Result<AppServices, BuildError> {
    let store: Arc<dyn ProductStore> = match &config.storage {
        StorageConfig::InMemory => {
            tracing::info!(backend = "memory", "using in-memory product store");
            Arc::new(InMemoryProductStore::new())
        }
        StorageConfig::Postgres { database_url } => {
            let store = PostgresProductStore::connect(database_url).await?;
            store.migrate().await?;
            tracing::info!(backend = "postgres", "connected to product database");
            Arc::new(store)
        }
    };

    Ok(AppServices::new(store)?)
}
