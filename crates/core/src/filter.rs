//! Filter criteria and title search.
//!
//! Filtering recomputes over the full product list on every call; there
//! is no incremental index.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, Product};

/// Default upper bound of the price filter.
pub const DEFAULT_MAX_PRICE: i64 = 1000;

/// Queries must be longer than this many characters to produce suggestions.
pub const SUGGESTION_MIN_EXCLUSIVE_LEN: usize = 2;

/// Errors that can occur when building a price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceRangeError {
    #[error("Minimum price cannot be negative")]
    NegativeMin,
    #[error("Minimum price cannot exceed maximum price")]
    Inverted,
}

/// Inclusive price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::from(DEFAULT_MAX_PRICE),
        }
    }
}

impl PriceRange {
    #[must_use]
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Build a range some price could fall into.
    ///
    /// # Errors
    ///
    /// Returns an error if `min` is negative or greater than `max`.
    pub fn checked(min: Decimal, max: Decimal) -> Result<Self, PriceRangeError> {
        if min.is_sign_negative() && !min.is_zero() {
            return Err(PriceRangeError::NegativeMin);
        }
        if min > max {
            return Err(PriceRangeError::Inverted);
        }
        Ok(Self { min, max })
    }

    /// Whether `min <= price <= max`.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        let amount = price.amount();
        amount >= self.min && amount <= self.max
    }
}

/// Transient predicate state used to derive the visible product subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Exact category to match, or `None` for all categories.
    pub selected_category: Option<String>,
    pub price_range: PriceRange,
    pub search_term: String,
}

impl FilterCriteria {
    /// Category match: exact string equality, or unset.
    #[must_use]
    pub fn matches_category(&self, product: &Product) -> bool {
        self.selected_category
            .as_deref()
            .is_none_or(|category| product.category == category)
    }

    /// Whether a product passes the category and price filters.
    ///
    /// The search term is not applied here; title search is a separate
    /// operation (see [`search_titles`]).
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_category(product) && self.price_range.contains(product.price)
    }

    /// Products passing the category and price filters, in catalog order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect()
    }
}

/// Normalize a category selection: blank means "all categories".
#[must_use]
pub fn normalize_category(category: Option<String>) -> Option<String> {
    category.filter(|c| !c.trim().is_empty())
}

/// Case-insensitive title substring search.
#[must_use]
pub fn search_titles(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|product| product.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Other products in the same category, for the detail page slider.
#[must_use]
pub fn related(products: &[Product], product: &Product) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.id != product.id && p.category == product.category)
        .cloned()
        .collect()
}

/// Whether a query is long enough to show suggestions.
#[must_use]
pub fn wants_suggestions(query: &str) -> bool {
    query.chars().count() > SUGGESTION_MIN_EXCLUSIVE_LEN
}

/// Suggestions for a search query.
///
/// Returns `None` when the query is too short to show suggestions at all,
/// and `Some` (possibly empty, "No results found") otherwise.
#[must_use]
pub fn suggestions(products: &[Product], query: &str) -> Option<Vec<Product>> {
    wants_suggestions(query).then(|| search_titles(products, query))
}
