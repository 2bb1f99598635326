//! Integration tests for the Zudio storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zudio-integration-tests
//! ```
//!
//! Each test starts a mock catalog and a storefront server on ephemeral
//! local ports, with cart and wishlist stored in a temporary directory.
//! Nothing leaves the machine.
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Listing, filters, detail, categories
//! - `storefront_cart` - Cart mutations, pagination, persistence
//! - `storefront_wishlist` - Wishlist rules and move-to-cart
//! - `storefront_search` - Title search and debounced suggestions

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path as UrlPath, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;
use zudio_storefront::config::{CatalogConfig, StorefrontConfig};
use zudio_storefront::routes;
use zudio_storefront::state::AppState;
use zudio_storefront::storage::FileStore;

/// Debounce used by test servers; short so suggestion tests stay fast.
pub const TEST_DEBOUNCE: Duration = Duration::from_millis(50);

// =============================================================================
// Mock catalog
// =============================================================================

/// A product as the mock catalog serves it.
#[derive(Debug, Clone, Serialize)]
pub struct MockProduct {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
}

impl MockProduct {
    #[must_use]
    pub fn new(id: i64, title: &str, category: &str, price: f64) -> Self {
        Self {
            id,
            title: title.to_string(),
            price,
            description: format!("{title} description"),
            category: category.to_string(),
            image: format!("https://img.example/{id}.jpg"),
            discount: None,
        }
    }

    #[must_use]
    pub fn with_discount(mut self, percent: f64) -> Self {
        self.discount = Some(percent);
        self
    }
}

/// The default mock catalog: five products across two categories.
#[must_use]
pub fn sample_products() -> Vec<MockProduct> {
    vec![
        MockProduct::new(1, "Fjallraven - Foldsack No. 1 Backpack", "men's clothing", 109.95),
        MockProduct::new(2, "Mens Casual Premium Slim Fit T-Shirts", "men's clothing", 22.3),
        MockProduct::new(5, "Solid Gold Petite Micropave", "jewelery", 168.0).with_discount(10.0),
        MockProduct::new(9, "WD 2TB Elements Portable External Hard Drive", "electronics", 64.0),
        MockProduct::new(10, "SanDisk SSD PLUS 1TB Internal SSD", "electronics", 10.0),
    ]
}

#[derive(Clone)]
struct MockCatalogState {
    products: Arc<Vec<MockProduct>>,
    fail_categories: bool,
    product_list_hits: Arc<AtomicUsize>,
}

/// A local stand-in for the remote catalog API.
pub struct MockCatalog {
    pub base_url: Url,
    product_list_hits: Arc<AtomicUsize>,
}

impl MockCatalog {
    /// Serve `products`; unknown ids answer 200 with an empty body.
    pub async fn start(products: Vec<MockProduct>, fail_categories: bool) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = MockCatalogState {
            products: Arc::new(products),
            fail_categories,
            product_list_hits: hits.clone(),
        };

        let app = Router::new()
            .route("/products", get(mock_products))
            .route("/products/categories", get(mock_categories))
            .route("/products/{id}", get(mock_product))
            .with_state(state);

        let addr = serve(app).await;
        Self {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            product_list_hits: hits,
        }
    }

    /// How many times the full product list was requested.
    #[must_use]
    pub fn product_list_hits(&self) -> usize {
        self.product_list_hits.load(Ordering::SeqCst)
    }
}

async fn mock_products(State(state): State<MockCatalogState>) -> Json<Vec<MockProduct>> {
    state.product_list_hits.fetch_add(1, Ordering::SeqCst);
    Json(state.products.as_ref().clone())
}

async fn mock_product(
    State(state): State<MockCatalogState>,
    UrlPath(id): UrlPath<i64>,
) -> Response {
    state
        .products
        .iter()
        .find(|p| p.id == id)
        .map_or_else(|| String::new().into_response(), |p| Json(p.clone()).into_response())
}

async fn mock_categories(State(state): State<MockCatalogState>) -> Response {
    if state.fail_categories {
        return (StatusCode::INTERNAL_SERVER_ERROR, "catalog down").into_response();
    }
    let mut categories: Vec<String> = state.products.iter().map(|p| p.category.clone()).collect();
    categories.dedup();
    Json(categories).into_response()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// =============================================================================
// Storefront under test
// =============================================================================

/// A running storefront backed by a mock catalog and a temp data dir.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub catalog: MockCatalog,
    data_dir: TempDir,
}

impl TestContext {
    /// Storefront over the sample catalog.
    pub async fn new() -> Self {
        Self::with_catalog(sample_products(), false).await
    }

    /// Storefront over a custom catalog.
    pub async fn with_catalog(products: Vec<MockProduct>, fail_categories: bool) -> Self {
        let catalog = MockCatalog::start(products, fail_categories).await;
        let data_dir = TempDir::new().unwrap();
        let base_url = start_storefront(&catalog.base_url, data_dir.path()).await;

        let ctx = Self {
            client: Client::new(),
            base_url,
            catalog,
            data_dir,
        };
        ctx.wait_for_categories().await;
        ctx
    }

    /// Start a second storefront on the same catalog and data dir, as after
    /// a restart. The old server keeps running but is no longer used.
    pub async fn restart(&mut self) {
        self.base_url = start_storefront(&self.catalog.base_url, self.data_dir.path()).await;
        self.wait_for_categories().await;
    }

    /// Where cart and wishlist files live.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path and return status and JSON body.
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        read(resp).await
    }

    /// POST a JSON body and return status and JSON body.
    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        read(resp).await
    }

    /// PUT a JSON body and return status and JSON body.
    pub async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        read(resp).await
    }

    /// Add a product to the cart and assert success.
    pub async fn add_to_cart(&self, id: i64) -> Value {
        let (status, body) = self.post("/api/cart/add", json!({ "product_id": id })).await;
        assert_eq!(status, StatusCode::OK, "add to cart failed: {body}");
        body
    }

    /// Category loading runs in the background; tests start after it settles.
    async fn wait_for_categories(&self) {
        for _ in 0..100 {
            let (_, body) = self.get("/api/categories").await;
            if matches!(body["status"].as_str(), Some("loaded" | "failed")) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("categories never finished loading");
    }
}

async fn start_storefront(catalog_url: &Url, data_dir: &Path) -> String {
    let config = StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        data_dir: data_dir.to_path_buf(),
        catalog: CatalogConfig::with_base_url(catalog_url.clone()),
        search_debounce: TEST_DEBOUNCE,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };

    let store = FileStore::open(data_dir).unwrap();
    let state = AppState::new(&config, Arc::new(store)).unwrap();
    state.start_category_loading();

    let addr = serve(routes::app(state)).await;
    format!("http://{addr}")
}

async fn read(resp: reqwest::Response) -> (StatusCode, Value) {
    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
    let text = resp.text().await.unwrap();
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}
