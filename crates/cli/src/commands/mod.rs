//! Command implementations.
//!
//! Every command opens a [`Session`]: configuration from the environment,
//! the catalog client and the shop container loaded from the data
//! directory. Changes are persisted by the container as they happen.

pub mod cart;
pub mod catalog;
pub mod wishlist;

use std::io;
use std::sync::Arc;

use thiserror::Error;
use zudio_core::{PriceRangeError, ProductId};
use zudio_storefront::catalog::{CatalogClient, CatalogError};
use zudio_storefront::config::{ConfigError, StorefrontConfig};
use zudio_storefront::shop::{AddRefusal, MoveToCartError, ShopContext};
use zudio_storefront::storage::{FileStore, StorageError};

use crate::view::Marks;

/// Errors that can occur running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Refused(#[from] AddRefusal),

    #[error("{0}")]
    PriceRange(#[from] PriceRangeError),

    #[error("{0}")]
    Move(#[from] MoveToCartError),

    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

/// Catalog client and shop state for one command run.
pub struct Session {
    pub catalog: CatalogClient,
    pub shop: ShopContext,
}

impl Session {
    /// Open a session from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the data directory
    /// cannot be created or the HTTP client cannot be built.
    pub fn open() -> Result<Self, CliError> {
        let config = StorefrontConfig::from_env()?;
        let store = FileStore::open(&config.data_dir)?;
        tracing::debug!(data_dir = %store.dir().display(), "Opened local storage");

        Ok(Self {
            catalog: CatalogClient::new(&config.catalog)?,
            shop: ShopContext::load(Arc::new(store)),
        })
    }

    /// Session over in-memory storage and a catalog nobody listens on.
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        use zudio_storefront::config::CatalogConfig;
        use zudio_storefront::storage::MemoryStore;

        let config = CatalogConfig {
            timeout: std::time::Duration::from_millis(200),
            ..CatalogConfig::default()
        };
        Self {
            catalog: CatalogClient::new(&config).expect("catalog client builds"),
            shop: ShopContext::load(Arc::new(MemoryStore::new())),
        }
    }

    /// Cart and wishlist membership of a product.
    #[must_use]
    pub fn marks(&self, id: ProductId) -> Marks {
        Marks {
            in_cart: self.shop.is_product_in_cart(id),
            in_wishlist: self.shop.is_product_in_wishlist(id),
        }
    }
}
