//! Filter state route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use zudio_core::{FilterCriteria, PriceRange};

use crate::error::Result;
use crate::state::AppState;

/// Partial filter update. Absent fields keep their current value; an
/// empty `category` selects all categories.
#[derive(Debug, Default, Deserialize)]
pub struct FilterUpdate {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search_term: Option<String>,
}

/// Current filter criteria.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<FilterCriteria> {
    Json(state.shop().filters())
}

/// Replace the given filter fields.
///
/// The range is validated before anything changes, so a rejected update
/// leaves every field untouched.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(update): Json<FilterUpdate>,
) -> Result<Json<FilterCriteria>> {
    let shop = state.shop();
    let current = shop.filters().price_range;
    let range = PriceRange::checked(
        update.min_price.unwrap_or(current.min),
        update.max_price.unwrap_or(current.max),
    )?;

    if update.category.is_some() {
        shop.set_selected_category(update.category);
    }
    shop.set_price_range(range);
    if let Some(term) = update.search_term {
        shop.set_search_term(term);
    }

    Ok(Json(shop.filters()))
}

/// Restore the default criteria.
#[instrument(skip(state))]
pub async fn reset(State(state): State<AppState>) -> Json<FilterCriteria> {
    state.shop().reset_filters();
    Json(state.shop().filters())
}
