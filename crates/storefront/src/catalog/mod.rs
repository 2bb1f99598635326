//! Remote catalog API client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`: `GET /products`, `GET /products/{id}`,
//!   `GET /products/categories`
//! - The catalog is the source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for API responses (5 minute TTL by default)
//! - No retry or backoff; callers decide how to degrade
//!
//! # Example
//!
//! ```rust,ignore
//! use zudio_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let products = client.get_products().await?;
//! let product = client.get_product(ProductId::new(1)).await?;
//! ```

mod cache;
mod conversions;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;
use zudio_core::{Product, ProductId};

use crate::config::CatalogConfig;
use crate::latest::LatestRequest;

use cache::{CacheKey, CacheValue};
pub use conversions::{ApiProduct, ConversionError, convert_product, convert_products};

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Product could not be represented in the domain model.
    #[error("Invalid product: {0}")]
    Conversion(#[from] ConversionError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Base URL cannot carry path segments.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// Client for the remote catalog API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
    list_refresh: LatestRequest,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
                list_refresh: LatestRequest::new(),
            }),
        })
    }

    /// Build an endpoint URL from path segments below the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute a GET request and return the body text.
    ///
    /// A 404 maps to `CatalogError::NotFound`.
    async fn get_text(&self, url: Url) -> Result<String, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    /// Execute a GET request and parse the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get every product in the catalog.
    ///
    /// Products the domain cannot represent are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is not a
    /// product list.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let ticket = self.inner.list_refresh.begin();
        let url = self.endpoint(&["products"])?;
        let api: Vec<ApiProduct> = self.get_json(url).await?;
        let products = convert_products(api);

        // A newer fetch or an invalidation owns the cache slot now
        if self.inner.list_refresh.is_current(ticket) {
            self.inner
                .cache
                .insert(CacheKey::Products, CacheValue::Products(products.clone()))
                .await;
        } else {
            debug!("Discarding stale product list");
        }

        Ok(products)
    }

    /// Get every product, degrading to an empty list on failure.
    ///
    /// The failure is logged; the catalog view then shows "no products".
    pub async fn get_products_or_empty(&self) -> Vec<Product> {
        match self.get_products().await {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching products");
                Vec::new()
            }
        }
    }

    /// Get a single product by id.
    ///
    /// The catalog answers unknown ids with either a 404 or an empty body;
    /// both map to `CatalogError::NotFound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", &id.to_string()])?;
        let not_found = || CatalogError::NotFound(format!("Product not found: {id}"));

        let body = self.get_text(url).await.map_err(|e| match e {
            CatalogError::NotFound(_) => not_found(),
            other => other,
        })?;
        if body.trim().is_empty() {
            return Err(not_found());
        }

        let api: Option<ApiProduct> = serde_json::from_str(&body)?;
        let product = convert_product(api.ok_or_else(not_found)?)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Get the list of category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is not a list
    /// of strings.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = self.endpoint(&["products", "categories"])?;
        let categories: Vec<String> = self.get_json(url).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Drop every cached response.
    ///
    /// Product list fetches already in flight will not repopulate the cache.
    pub fn invalidate_cache(&self) {
        self.inner.list_refresh.begin();
        self.inner.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig::with_base_url(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let client = client("http://localhost:9000/api");
        let url = client.endpoint(&["products", "7"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/products/7");
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let client = client("https://fakestoreapi.com/");
        let url = client.endpoint(&["products", "categories"]).unwrap();
        assert_eq!(url.as_str(), "https://fakestoreapi.com/products/categories");
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::NotFound("Product not found: 3".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found: 3");
    }
}
