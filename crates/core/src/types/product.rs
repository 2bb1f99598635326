//! Catalog product.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Discount, Price};

/// Title length in the wishlist.
pub const WISHLIST_TITLE_CHARS: usize = 18;

/// Title length in the related-products slider.
pub const SLIDER_TITLE_CHARS: usize = 20;

/// A product as published by the catalog.
///
/// Products are immutable once fetched; the catalog owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Optional percentage discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
}

impl Product {
    /// Price after applying the discount, if any.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        match self.discount {
            Some(discount) if discount.is_active() => discount.apply(self.price),
            _ => self.price,
        }
    }

    /// Whether a non-zero discount is applied.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount.is_some_and(|d| d.is_active())
    }

    /// Title truncated to `max_chars` characters, with a trailing `...`
    /// when anything was cut.
    #[must_use]
    pub fn short_title(&self, max_chars: usize) -> String {
        if self.title.chars().count() <= max_chars {
            return self.title.clone();
        }
        let mut short: String = self.title.chars().take(max_chars).collect();
        short.push_str("...");
        short
    }
}
