//! Handler state: catalog client, shop container and suggestion debouncer.

use std::sync::Arc;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::search::SuggestionDebouncer;
use crate::shop::ShopContext;
use crate::storage::KeyValueStore;

/// Cloned into every handler; clones share one catalog cache and one cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: CatalogClient,
    shop: ShopContext,
    suggestions: SuggestionDebouncer,
}

impl AppState {
    /// Build the catalog client and load the cart and wishlist from `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(
        config: &StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let shop = ShopContext::load(storage);
        let suggestions = SuggestionDebouncer::new(config.search_debounce);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                catalog,
                shop,
                suggestions,
            }),
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    #[must_use]
    pub fn shop(&self) -> &ShopContext {
        &self.inner.shop
    }

    /// Run a shop mutation on the blocking pool.
    ///
    /// Mutations write through to storage while holding the collections
    /// lock, and file writes must not stall the async workers.
    pub async fn mutate_shop<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&ShopContext) -> T + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        match tokio::task::spawn_blocking(move || f(state.shop())).await {
            Ok(value) => value,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    #[must_use]
    pub fn suggestions(&self) -> &SuggestionDebouncer {
        &self.inner.suggestions
    }

    /// Fetch categories in the background.
    ///
    /// The server starts serving immediately; the category endpoint reports
    /// `loading` until the fetch settles.
    pub fn start_category_loading(&self) {
        let state = self.clone();
        tokio::spawn(async move {
            state.shop().load_categories(state.catalog()).await;
        });
    }
}
