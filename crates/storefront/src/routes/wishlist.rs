//! Wishlist route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;
use zudio_core::{Product, WISHLIST_TITLE_CHARS};

use super::cart::ProductRequest;
use crate::error::{Result, shopper_breadcrumb};
use crate::state::AppState;

/// Wishlist entry display data.
#[derive(Debug, Serialize)]
pub struct WishlistItemView {
    #[serde(flatten)]
    pub product: Product,
    pub short_title: String,
    pub discounted_price: Decimal,
}

impl From<Product> for WishlistItemView {
    fn from(product: Product) -> Self {
        Self {
            short_title: product.short_title(WISHLIST_TITLE_CHARS),
            discounted_price: product.discounted_price().rounded(),
            product,
        }
    }
}

/// The wishlist page.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<WishlistItemView>,
    pub count: usize,
}

impl WishlistView {
    fn current(state: &AppState) -> Self {
        let items: Vec<WishlistItemView> = state
            .shop()
            .wishlist()
            .items()
            .iter()
            .cloned()
            .map(WishlistItemView::from)
            .collect();
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Wishlist mutation result: a toast message and the refreshed wishlist.
#[derive(Debug, Serialize)]
pub struct WishlistMutation {
    pub message: &'static str,
    pub wishlist: WishlistView,
}

impl WishlistMutation {
    fn new(message: &'static str, state: &AppState) -> Json<Self> {
        Json(Self {
            message,
            wishlist: WishlistView::current(state),
        })
    }
}

/// Display the wishlist.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<WishlistView> {
    Json(WishlistView::current(&state))
}

/// Add a product to the wishlist.
///
/// Refused when the product is already in the cart or the wishlist.
#[instrument(skip(state), fields(product_id = %req.product_id))]
pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<WishlistMutation>> {
    let product = state.catalog().get_product(req.product_id).await?;
    state
        .mutate_shop(move |shop| shop.try_add_to_wishlist(&product))
        .await?;

    shopper_breadcrumb("wishlist", "Added to wishlist", req.product_id);

    Ok(WishlistMutation::new("Item added to wishlist!", &state))
}

/// Remove a product from the wishlist.
#[instrument(skip(state), fields(product_id = %req.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Json<WishlistMutation> {
    let id = req.product_id;
    state
        .mutate_shop(move |shop| shop.remove_from_wishlist(id))
        .await;
    WishlistMutation::new("Item removed from wishlist!", &state)
}

/// Move a wishlist product into the cart.
///
/// A product that is also in the cart gets one more unit there.
#[instrument(skip(state), fields(product_id = %req.product_id))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<WishlistMutation>> {
    let id = req.product_id;
    state.mutate_shop(move |shop| shop.move_to_cart(id)).await?;

    shopper_breadcrumb("wishlist", "Moved to cart", req.product_id);

    Ok(WishlistMutation::new("Item added to cart!", &state))
}
