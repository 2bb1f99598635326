//! Cart route handlers.
//!
//! The cart lives in the shop container and is persisted locally after
//! every change. Adding a product that is already in the cart is refused
//! with a 409 so the shopper sees "already in your cart" instead of a
//! silent quantity bump; quantities change through `/update`.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zudio_core::ProductId;

use crate::error::{Result, shopper_breadcrumb};
use crate::shop::{AddRefusal, CartSummary};
use crate::state::AppState;

/// Cart page query parameters.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub page: Option<u32>,
}

/// Request naming a single product.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub product_id: ProductId,
}

/// Update quantity request.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Cart mutation result: a toast message and the refreshed cart page.
#[derive(Debug, Serialize)]
pub struct CartMutation {
    pub message: &'static str,
    pub cart: CartSummary,
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Display the cart.
///
/// `?page=` moves the cart cursor first; an out-of-range page leaves it
/// where it was.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<CartQuery>,
) -> Json<CartSummary> {
    if let Some(page) = query.page {
        state.shop().set_cart_page(page);
    }
    Json(state.shop().cart_summary())
}

/// Add a product to the cart.
#[instrument(skip(state), fields(product_id = %req.product_id))]
pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<CartMutation>> {
    let product = state.catalog().get_product(req.product_id).await?;
    let cart = state
        .mutate_shop(move |shop| {
            shop.try_add_to_cart(&product)?;
            Ok::<_, AddRefusal>(shop.cart_summary())
        })
        .await?;

    shopper_breadcrumb("cart", "Added to cart", req.product_id);

    Ok(Json(CartMutation {
        message: "Item added to cart!",
        cart,
    }))
}

/// Set the quantity of a cart line.
///
/// Non-positive quantities and unknown products are ignored.
#[instrument(skip(state), fields(product_id = %req.product_id, quantity = req.quantity))]
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateCartRequest>,
) -> Json<CartMutation> {
    let cart = state
        .mutate_shop(move |shop| {
            shop.update_cart_item(req.product_id, req.quantity);
            shop.cart_summary()
        })
        .await;

    Json(CartMutation {
        message: "Cart updated!",
        cart,
    })
}

/// Remove a product from the cart.
#[instrument(skip(state), fields(product_id = %req.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Json<CartMutation> {
    let id = req.product_id;
    let cart = state
        .mutate_shop(move |shop| {
            shop.remove_cart_item(id);
            shop.cart_summary()
        })
        .await;

    shopper_breadcrumb("cart", "Removed from cart", id);

    Json(CartMutation {
        message: "Item removed from cart!",
        cart,
    })
}

/// Cart count badge: total quantity across lines.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    Json(CartCount {
        count: state.shop().cart_count(),
    })
}
