//! Debounced search suggestions.
//!
//! Typing fires one request per keystroke. Each request waits out the
//! debounce delay and then checks whether a newer request has arrived; only
//! the latest one computes suggestions. The same check runs again after the
//! product list is loaded, so a slow catalog response for an old query can
//! never replace the answer for a newer one.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use zudio_core::{Product, filter};

use crate::latest::LatestRequest;

/// Outcome of a suggestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Suggestions {
    /// Query too short; the dropdown is hidden.
    Hidden,
    /// A newer request replaced this one.
    Superseded,
    /// Matching products; empty means "No results found".
    Ready { products: Vec<Product> },
}

/// Debounces suggestion requests and discards stale ones.
#[derive(Debug)]
pub struct SuggestionDebouncer {
    delay: Duration,
    latest: LatestRequest,
}

impl SuggestionDebouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: LatestRequest::new(),
        }
    }

    /// Compute suggestions for `query` unless a newer request supersedes it.
    ///
    /// `load_products` is only called once the debounce delay has passed and
    /// this request is still the latest.
    pub async fn suggest<F, Fut>(&self, query: &str, load_products: F) -> Suggestions
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<Product>>,
    {
        // Taking a ticket also cancels whatever is pending, even when this
        // query is too short to search.
        let ticket = self.latest.begin();
        if !filter::wants_suggestions(query) {
            return Suggestions::Hidden;
        }

        tokio::time::sleep(self.delay).await;
        if !self.latest.is_current(ticket) {
            tracing::debug!(query, "Suggestion request superseded during debounce");
            return Suggestions::Superseded;
        }

        let products = load_products().await;
        if !self.latest.is_current(ticket) {
            tracing::debug!(query, "Suggestion request superseded during catalog fetch");
            return Suggestions::Superseded;
        }

        Suggestions::Ready {
            products: filter::search_titles(&products, query),
        }
    }
}
