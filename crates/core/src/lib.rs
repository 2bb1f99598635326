//! Zudio Core - Shared domain types library.
//!
//! This crate provides the domain model used across all Zudio components:
//! - `storefront` - Local JSON storefront and state container
//! - `cli` - Terminal storefront over the same state container
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, discounts and products
//! - [`cart`] - Quantity-bearing cart collection
//! - [`wishlist`] - Quantity-less wishlist collection
//! - [`filter`] - Filter criteria and title search
//! - [`pagination`] - Page math and page-number display sets

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod filter;
pub mod pagination;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartEntry};
pub use filter::{FilterCriteria, PriceRange, PriceRangeError};
pub use pagination::{PageInfo, Pagination};
pub use types::*;
pub use wishlist::Wishlist;
