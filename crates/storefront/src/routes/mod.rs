//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Health check
//!
//! # Catalog
//! GET  /api/products                 - Filtered, paginated listing
//! GET  /api/products/{id}            - Product detail
//! POST /api/products/refresh         - Drop cached catalog responses
//! GET  /api/categories               - Category load state
//!
//! # Filters
//! GET  /api/filters                  - Current criteria
//! PUT  /api/filters                  - Update criteria
//! POST /api/filters/reset            - Restore defaults
//!
//! # Search
//! GET  /api/search                   - Title search
//! GET  /api/search/suggestions       - Debounced suggestions
//!
//! # Cart
//! GET  /api/cart                     - Cart page and totals
//! POST /api/cart/add                 - Add product (409 if already in cart)
//! POST /api/cart/update              - Set quantity
//! POST /api/cart/remove              - Remove product
//! GET  /api/cart/count               - Badge count
//!
//! # Wishlist
//! GET  /api/wishlist                 - Wishlist entries
//! POST /api/wishlist/add             - Add product (409 if in cart or wishlist)
//! POST /api/wishlist/remove          - Remove product
//! POST /api/wishlist/move-to-cart    - Move product to cart
//! ```

pub mod cart;
pub mod filters;
pub mod products;
pub mod search;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/refresh", post(products::refresh))
        .route("/{id}", get(products::show))
}

/// Create the filter routes router.
pub fn filter_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(filters::show).put(filters::update))
        .route("/reset", post(filters::reset))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search::search))
        .route("/suggestions", get(search::suggestions))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/move-to-cart", post(wishlist::move_to_cart))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .nest("/filters", filter_routes())
        .nest("/search", search_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
}

/// Build the full application: API routes, health check and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
