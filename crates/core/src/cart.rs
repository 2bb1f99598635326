//! Quantity-bearing cart collection.
//!
//! The cart holds at most one [`CartEntry`] per product id. Every operation
//! here is pure and in-memory; persistence and locking live in the
//! storefront's state container.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// A product in the cart together with its quantity.
///
/// Serializes flat: the product fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1 while the entry is in a cart.
    pub quantity: u32,
}

impl CartEntry {
    /// Product id of this entry.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity, unrounded. Saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// The cart collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from stored entries.
    ///
    /// Entries with a zero quantity are dropped and duplicate ids are
    /// merged into the first occurrence, so the uniqueness invariant holds
    /// even for hand-edited storage.
    #[must_use]
    pub fn from_entries(entries: Vec<CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in entries {
            if entry.quantity == 0 {
                continue;
            }
            match cart.entry_mut(entry.id()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(entry.quantity);
                }
                None => cart.entries.push(entry),
            }
        }
        cart
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by product id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    fn entry_mut(&mut self, id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    /// Whether the product is in the cart.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing entry or inserts a new one with quantity 1.
    /// Returns the entry's new quantity, or `None` if the cart total would
    /// no longer fit in a [`Decimal`]; the cart is unchanged in that case.
    pub fn add(&mut self, product: &Product) -> Option<u32> {
        let before = self.total_fits();
        let quantity = match self.entry_mut(product.id) {
            Some(entry) => {
                let previous = entry.quantity;
                entry.quantity = previous.checked_add(1)?;
                if before && !self.total_fits() {
                    if let Some(entry) = self.entry_mut(product.id) {
                        entry.quantity = previous;
                    }
                    return None;
                }
                previous + 1
            }
            None => {
                self.entries.push(CartEntry {
                    product: product.clone(),
                    quantity: 1,
                });
                if before && !self.total_fits() {
                    self.entries.pop();
                    return None;
                }
                1
            }
        };
        Some(quantity)
    }

    /// Replace the quantity of an existing entry.
    ///
    /// Non-positive quantities are ignored, as are ids not in the cart and
    /// quantities whose line total would overflow the cart total.
    /// Returns whether the cart changed.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        let Ok(quantity) = u32::try_from(quantity) else {
            return false;
        };
        if quantity == 0 {
            return false;
        }
        let before = self.total_fits();
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        let previous = entry.quantity;
        if previous == quantity {
            return false;
        }
        entry.quantity = quantity;
        if before && !self.total_fits() {
            if let Some(entry) = self.entry_mut(id) {
                entry.quantity = previous;
            }
            return false;
        }
        true
    }

    /// Remove the entry for a product. Returns whether anything was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id() != id);
        self.entries.len() != before
    }

    /// Sum of price times quantity over all entries, unrounded.
    ///
    /// Saturates at [`Decimal::MAX`], which only a hand-edited stored cart
    /// can reach; [`add`](Self::add) and
    /// [`update_quantity`](Self::update_quantity) refuse changes that would.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.checked_total().unwrap_or(Decimal::MAX)
    }

    /// Sum of price times quantity, or `None` if it does not fit.
    #[must_use]
    pub fn checked_total(&self) -> Option<Decimal> {
        self.entries.iter().try_fold(Decimal::ZERO, |sum, entry| {
            sum.checked_add(entry.product.price.checked_times(entry.quantity)?)
        })
    }

    fn total_fits(&self) -> bool {
        self.checked_total().is_some()
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.quantity)).sum()
    }
}
