//! Search route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zudio_core::filter;

use super::products::ProductView;
use crate::search::Suggestions;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Full title search results.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub products: Vec<ProductView>,
}

/// Title search over the whole catalog.
///
/// Without `q`, the shared search term is used.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResults> {
    let query = query
        .q
        .unwrap_or_else(|| state.shop().filters().search_term);
    let products = state.catalog().get_products_or_empty().await;

    let products = filter::search_titles(&products, &query)
        .into_iter()
        .map(|p| ProductView::new(p, state.shop()))
        .collect();

    Json(SearchResults { query, products })
}

/// Debounced suggestions for the search box.
///
/// Answers `superseded` when a newer suggestion request arrived while this
/// one was waiting.
#[instrument(skip(state))]
pub async fn suggestions(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Suggestions> {
    let query = query.q.unwrap_or_default();
    let catalog = state.catalog().clone();
    let result = state
        .suggestions()
        .suggest(&query, || async move { catalog.get_products_or_empty().await })
        .await;
    Json(result)
}
