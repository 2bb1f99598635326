//! Zudio storefront library.
//!
//! The storefront keeps one shopper's cart, wishlist and catalog filters,
//! backed by a remote product catalog and local file persistence. This
//! crate provides it as a library so the HTTP server, the CLI and the
//! integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod latest;
pub mod middleware;
pub mod routes;
pub mod search;
pub mod shop;
pub mod state;
pub mod storage;
