//! Core types for Zudio.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::*;
pub use price::{Discount, DiscountError, Price, PriceError};
pub use product::{Product, SLIDER_TITLE_CHARS, WISHLIST_TITLE_CHARS};
