//! Integration tests for the cart API.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use zudio_integration_tests::{MockProduct, TestContext};

fn amount(value: &Value) -> f64 {
    value.as_str().unwrap().parse().unwrap()
}

fn cart_ids(cart: &Value) -> Vec<i64> {
    cart["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_add_then_duplicate_add_is_conflict() {
    let ctx = TestContext::new().await;

    let body = ctx.add_to_cart(10).await;
    assert_eq!(body["message"], "Item added to cart!");
    assert_eq!(body["cart"]["items"][0]["quantity"], 1);

    let (status, body) = ctx.post("/api/cart/add", json!({ "product_id": 10 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "This item is already in your cart!");

    let (_, count) = ctx.get("/api/cart/count").await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.post("/api/cart/add", json!({ "product_id": 404 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cart) = ctx.get("/api/cart").await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_quantity_and_total() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(10).await;

    let (status, body) = ctx
        .post("/api/cart/update", json!({ "product_id": 10, "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["item_count"], 3);
    assert!((amount(&body["cart"]["total"]) - 30.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_non_positive_quantity_is_ignored() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(10).await;

    for quantity in [0, -2] {
        let (status, body) = ctx
            .post(
                "/api/cart/update",
                json!({ "product_id": 10, "quantity": quantity }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cart"]["items"][0]["quantity"], 1);
    }
}

#[tokio::test]
async fn test_total_is_rounded_to_cents() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(2).await;

    let (_, cart) = ctx.get("/api/cart").await;
    // 109.95 + 22.3
    assert_eq!(cart["total"], "132.25");
}

#[tokio::test]
async fn test_remove_and_remove_absent() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(9).await;
    ctx.add_to_cart(10).await;

    let (status, body) = ctx.post("/api/cart/remove", json!({ "product_id": 9 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item removed from cart!");
    assert_eq!(cart_ids(&body["cart"]), vec![10]);

    let (status, body) = ctx.post("/api/cart/remove", json!({ "product_id": 9 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart_ids(&body["cart"]), vec![10]);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let mut ctx = TestContext::new().await;
    ctx.add_to_cart(9).await;
    ctx.post("/api/cart/update", json!({ "product_id": 9, "quantity": 2 }))
        .await;
    assert!(ctx.data_dir().join("cartItems.json").exists());

    ctx.restart().await;

    let (_, cart) = ctx.get("/api/cart").await;
    assert_eq!(cart_ids(&cart), vec![9]);
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["items"][0]["title"], "WD 2TB Elements Portable External Hard Drive");
}

#[tokio::test]
async fn test_cart_pagination() {
    let products = (1..=25)
        .map(|id| MockProduct::new(id, &format!("Item {id}"), "misc", 1.0))
        .collect();
    let ctx = TestContext::with_catalog(products, false).await;
    for id in 1..=25 {
        ctx.add_to_cart(id).await;
    }

    let (_, cart) = ctx.get("/api/cart").await;
    assert_eq!(cart_ids(&cart), (1..=10).collect::<Vec<_>>());
    assert_eq!(cart["page"]["total_pages"], 3);
    assert_eq!(cart["page"]["page_numbers"], json!([1, 2, 3]));

    let (_, cart) = ctx.get("/api/cart?page=3").await;
    assert_eq!(cart_ids(&cart), (21..=25).collect::<Vec<_>>());
    assert_eq!(cart["page"]["has_next"], false);

    // Out of range keeps the current page
    let (_, cart) = ctx.get("/api/cart?page=9").await;
    assert_eq!(cart["page"]["current_page"], 3);

    // Emptying the last page moves the cursor back
    for id in 21..=25 {
        ctx.post("/api/cart/remove", json!({ "product_id": id })).await;
    }
    let (_, cart) = ctx.get("/api/cart").await;
    assert_eq!(cart["page"]["current_page"], 2);
    assert_eq!(cart["page"]["total_pages"], 2);
}

#[tokio::test]
async fn test_concurrent_adds_all_land() {
    let products = (1..=20)
        .map(|id| MockProduct::new(id, &format!("Item {id}"), "misc", 2.0))
        .collect();
    let ctx = TestContext::with_catalog(products, false).await;

    let mut tasks = tokio::task::JoinSet::new();
    for id in 1..=20 {
        let client = ctx.client.clone();
        let url = ctx.url("/api/cart/add");
        tasks.spawn(async move {
            let resp = client
                .post(url)
                .json(&json!({ "product_id": id }))
                .send()
                .await
                .unwrap();
            resp.status()
        });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let (_, count) = ctx.get("/api/cart/count").await;
    assert_eq!(count["count"], 20);

    let stored = std::fs::read_to_string(ctx.data_dir().join("cartItems.json")).unwrap();
    let stored: Vec<Value> = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored.len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_of_one_product_admit_one() {
    let ctx = TestContext::new().await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let client = ctx.client.clone();
        let url = ctx.url("/api/cart/add");
        tasks.spawn(async move {
            let resp = client
                .post(url)
                .json(&json!({ "product_id": 9 }))
                .send()
                .await
                .unwrap();
            resp.status()
        });
    }
    let mut ok = 0;
    let mut conflict = 0;
    while let Some(status) = tasks.join_next().await {
        match status.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!((ok, conflict), (1, 9));

    let (_, count) = ctx.get("/api/cart/count").await;
    assert_eq!(count["count"], 1);
}
