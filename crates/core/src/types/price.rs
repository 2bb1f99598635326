//! Type-safe price and discount representation using decimal arithmetic.
//!
//! All amounts are kept exact as [`Decimal`]. Rounding happens once, at
//! display time, through [`round_currency`]: two decimal places, midpoint
//! away from zero. Every surface that shows money (cart page, navbar
//! dropdown, CLI) goes through the same function.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places shown for currency amounts.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Round an amount to cents for display.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        CURRENCY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Format an amount as a dollar string (e.g., "$19.99").
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format!("${:.2}", round_currency(amount))
}

/// Errors that can occur when constructing a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative product price in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the exact amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Get the amount rounded to cents.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        round_currency(self.0)
    }

    /// Multiply by a quantity, keeping full precision.
    ///
    /// Saturates at [`Decimal::MAX`]; use [`checked_times`](Self::checked_times)
    /// to detect that.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }

    /// Multiply by a quantity, or `None` if the result does not fit.
    #[must_use]
    pub fn checked_times(&self, quantity: u32) -> Option<Decimal> {
        self.0.checked_mul(Decimal::from(quantity))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(self.0))
    }
}

/// Errors that can occur when constructing a discount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountError {
    #[error("discount must be in [0, 100), got {0}")]
    OutOfRange(Decimal),
}

/// A percentage discount in the half-open range [0, 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Discount(Decimal);

impl Discount {
    /// Create a new discount percentage.
    ///
    /// # Errors
    ///
    /// Returns `DiscountError::OutOfRange` unless `0 <= percent < 100`.
    pub fn new(percent: Decimal) -> Result<Self, DiscountError> {
        if percent < Decimal::ZERO || percent >= Decimal::ONE_HUNDRED {
            return Err(DiscountError::OutOfRange(percent));
        }
        Ok(Self(percent))
    }

    /// Get the percentage value.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Whether this discount actually reduces the price.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.0.is_zero()
    }

    /// Apply the discount to a price, rounding the result to cents.
    #[must_use]
    pub fn apply(&self, price: Price) -> Price {
        let factor = Decimal::ONE - self.0 / Decimal::ONE_HUNDRED;
        // factor is in (0, 1], so the product stays non-negative
        Price(round_currency(price.amount() * factor))
    }
}

impl TryFrom<Decimal> for Discount {
    type Error = DiscountError;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        Self::new(percent)
    }
}

impl From<Discount> for Decimal {
    fn from(discount: Discount) -> Self {
        discount.0
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{}%", self.0.normalize())
    }
}
