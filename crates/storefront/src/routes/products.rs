//! Product and category route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zudio_core::filter::{self, PriceRange, normalize_category};
use zudio_core::pagination::CATALOG_ITEMS_PER_PAGE;
use zudio_core::{FilterCriteria, PageInfo, Pagination, Product, ProductId, SLIDER_TITLE_CHARS};

use crate::error::Result;
use crate::shop::{CategoryState, ShopContext};
use crate::state::AppState;

/// Product display data with the shopper's cart and wishlist flags.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// Price after discount, rounded to cents.
    pub discounted_price: Decimal,
    pub in_cart: bool,
    pub in_wishlist: bool,
}

impl ProductView {
    #[must_use]
    pub fn new(product: Product, shop: &ShopContext) -> Self {
        Self {
            discounted_price: product.discounted_price().rounded(),
            in_cart: shop.is_product_in_cart(product.id),
            in_wishlist: shop.is_product_in_wishlist(product.id),
            product,
        }
    }
}

/// Slider card for a related product.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedProduct {
    pub id: ProductId,
    pub short_title: String,
    pub image: String,
    pub discounted_price: Decimal,
}

impl From<&Product> for RelatedProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            short_title: product.short_title(SLIDER_TITLE_CHARS),
            image: product.image.clone(),
            discounted_price: product.discounted_price().rounded(),
        }
    }
}

/// Product detail page.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductView,
    pub related: Vec<RelatedProduct>,
}

/// Catalog listing query parameters.
///
/// Any filter given here overrides the shared filter state for this
/// request only.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<u32>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Narrow the listing to one product, as picked from the suggestions.
    pub selected: Option<ProductId>,
}

impl CatalogQuery {
    /// Merge the query's overrides into `base`.
    fn criteria(&self, mut base: FilterCriteria) -> Result<FilterCriteria> {
        if let Some(category) = &self.category {
            base.selected_category = normalize_category(Some(category.clone()));
        }
        base.price_range = PriceRange::checked(
            self.min_price.unwrap_or(base.price_range.min),
            self.max_price.unwrap_or(base.price_range.max),
        )?;
        Ok(base)
    }
}

/// One page of the filtered catalog.
#[derive(Debug, Serialize)]
pub struct CatalogPage {
    pub products: Vec<ProductView>,
    pub page: PageInfo,
    pub filters: FilterCriteria,
}

/// Product listing.
///
/// A catalog failure is logged and shown as an empty listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogPage>> {
    let filters = query.criteria(state.shop().filters())?;
    let products = state.catalog().get_products_or_empty().await;

    let mut visible = filters.apply(&products);
    if let Some(id) = query.selected {
        visible.retain(|p| p.id == id);
    }

    let cursor = Pagination::at(CATALOG_ITEMS_PER_PAGE, query.page.unwrap_or(1), visible.len());
    let page = cursor.info(visible.len());
    let products = cursor
        .slice(&visible)
        .iter()
        .cloned()
        .map(|p| ProductView::new(p, state.shop()))
        .collect();

    Ok(Json(CatalogPage {
        products,
        page,
        filters,
    }))
}

/// Product detail with same-category products for the slider.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetail>> {
    let product = state.catalog().get_product(id).await?;
    let products = state.catalog().get_products_or_empty().await;
    let related = filter::related(&products, &product)
        .iter()
        .map(RelatedProduct::from)
        .collect();

    Ok(Json(ProductDetail {
        product: ProductView::new(product, state.shop()),
        related,
    }))
}

/// Drop cached catalog responses so the next request refetches.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> StatusCode {
    state.catalog().invalidate_cache();
    tracing::info!("Catalog cache invalidated");
    StatusCode::NO_CONTENT
}

/// Category load state.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<CategoryState> {
    Json(state.shop().categories())
}
