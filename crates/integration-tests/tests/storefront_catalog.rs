//! Integration tests for catalog listing, detail, categories and filters.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use zudio_integration_tests::{MockProduct, TestContext, sample_products};

fn ids(body: &Value) -> Vec<i64> {
    body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let resp = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_listing_defaults() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/api/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 5, 9, 10]);
    assert_eq!(body["page"]["current_page"], 1);
    assert_eq!(body["page"]["total_pages"], 1);
    assert_eq!(body["filters"]["selected_category"], Value::Null);
}

#[tokio::test]
async fn test_listing_filters_by_category_and_price() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx
        .get("/api/products?category=electronics&min_price=0&max_price=50")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![10]);
}

#[tokio::test]
async fn test_listing_rejects_inverted_range() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/api/products?min_price=100&max_price=10").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Minimum price"));
}

#[tokio::test]
async fn test_selected_suggestion_narrows_listing() {
    let ctx = TestContext::new().await;
    let (_, body) = ctx.get("/api/products?selected=9").await;
    assert_eq!(ids(&body), vec![9]);
}

#[tokio::test]
async fn test_catalog_pages_hold_twelve() {
    let products = (1..=30)
        .map(|id| MockProduct::new(id, &format!("Item {id}"), "misc", 5.0))
        .collect();
    let ctx = TestContext::with_catalog(products, false).await;

    let (_, body) = ctx.get("/api/products?page=3").await;
    assert_eq!(ids(&body), (25..=30).collect::<Vec<_>>());
    assert_eq!(body["page"]["total_pages"], 3);
    assert_eq!(body["page"]["has_next"], false);
}

#[tokio::test]
async fn test_out_of_range_page_shows_last_page() {
    let products = (1..=30)
        .map(|id| MockProduct::new(id, &format!("Item {id}"), "misc", 5.0))
        .collect();
    let ctx = TestContext::with_catalog(products, false).await;

    let (status, body) = ctx.get("/api/products?page=99").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), (25..=30).collect::<Vec<_>>());
    assert_eq!(body["page"]["current_page"], 3);
    assert_eq!(body["page"]["page_numbers"], json!([1, 2, 3]));
    assert_eq!(body["page"]["has_next"], false);

    // A filter that empties the listing still reports page 1.
    let (_, body) = ctx.get("/api/products?page=4&max_price=1").await;
    assert!(ids(&body).is_empty());
    assert_eq!(body["page"]["current_page"], 1);
    assert_eq!(body["page"]["has_previous"], false);
}

#[tokio::test]
async fn test_shared_filters_apply_and_reset() {
    let ctx = TestContext::new().await;

    let (status, filters) = ctx
        .put("/api/filters", json!({ "category": "men's clothing", "max_price": 50 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filters["selected_category"], "men's clothing");

    let (_, body) = ctx.get("/api/products").await;
    assert_eq!(ids(&body), vec![2]);

    let (status, _) = ctx.post("/api/filters/reset", Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = ctx.get("/api/products").await;
    assert_eq!(ids(&body).len(), sample_products().len());
}

#[tokio::test]
async fn test_rejected_filter_update_changes_nothing() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx
        .put("/api/filters", json!({ "category": "jewelery", "min_price": -5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, filters) = ctx.get("/api/filters").await;
    assert_eq!(filters["selected_category"], Value::Null);
}

#[tokio::test]
async fn test_product_detail() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(5).await;

    let (status, body) = ctx.get("/api/products/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Solid Gold Petite Micropave");
    assert_eq!(body["in_cart"], true);
    assert_eq!(body["in_wishlist"], false);
    let discounted: f64 = body["discounted_price"].as_str().unwrap().parse().unwrap();
    assert!((discounted - 151.2).abs() < f64::EPSILON);
    assert!(body["related"].as_array().unwrap().is_empty());

    let (_, body) = ctx.get("/api/products/9").await;
    let related = body["related"].as_array().unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0]["id"], 10);
    assert_eq!(related[0]["short_title"], "SanDisk SSD PLUS 1TB...");
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/api/products/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_categories_loaded() {
    let ctx = TestContext::new().await;
    let (_, body) = ctx.get("/api/categories").await;

    assert_eq!(body["status"], "loaded");
    assert_eq!(
        body["categories"],
        json!(["men's clothing", "jewelery", "electronics"])
    );
}

#[tokio::test]
async fn test_category_failure_leaves_cart_working() {
    let ctx = TestContext::with_catalog(sample_products(), true).await;

    let (_, body) = ctx.get("/api/categories").await;
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().unwrap().starts_with("Error: "));

    ctx.add_to_cart(1).await;
    let (_, count) = ctx.get("/api/cart/count").await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_product_list_is_cached() {
    let ctx = TestContext::new().await;
    ctx.get("/api/products").await;
    ctx.get("/api/products?page=1").await;
    ctx.get("/api/search?q=ssd").await;

    assert_eq!(ctx.catalog.product_list_hits(), 1);
}

#[tokio::test]
async fn test_refresh_refetches_product_list() {
    let ctx = TestContext::new().await;
    ctx.get("/api/products").await;
    assert_eq!(ctx.catalog.product_list_hits(), 1);

    let resp = ctx
        .client
        .post(ctx.url("/api/products/refresh"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    ctx.get("/api/products").await;
    assert_eq!(ctx.catalog.product_list_hits(), 2);
}
