//! The shop state container.
//!
//! [`ShopContext`] is the single source of truth for the cart, wishlist,
//! filter criteria, cart pagination cursor and category load state. Views
//! receive it explicitly (through `AppState` or the CLI) and mutate it only
//! through the operations defined here.
//!
//! # Locking
//!
//! Cart, wishlist and the cart cursor share one mutex. Each mutation reads
//! the latest collection, applies the change and writes the whole collection
//! to local storage before releasing the lock, so two concurrent adds of the
//! same product always produce one entry with quantity 2.
//!
//! Filters and the category state have their own locks; nothing ever holds
//! two of these locks at once.

mod categories;

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use zudio_core::pagination::CART_ITEMS_PER_PAGE;
use zudio_core::types::price::round_currency;
use zudio_core::{
    Cart, CartEntry, FilterCriteria, PageInfo, Pagination, PriceRange, Product, ProductId,
    Wishlist, filter,
};

use crate::catalog::CatalogClient;
use crate::storage::{KeyValueStore, load_json, save_json, storage_keys};

pub use categories::CategoryState;

/// An add the shopper is told to skip instead of silently merging.
///
/// The plain container operations tolerate repeat adds; views go through
/// the `try_add_*` operations, which check and add under one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddRefusal {
    #[error("This item is already in your cart!")]
    AlreadyInCart,
    #[error("This item is already in your cart, cannot be added to wishlist!")]
    InCartNotWishlistable,
    #[error("This item is already in your wishlist!")]
    AlreadyInWishlist,
    #[error("This item cannot be added: the cart total would be too large!")]
    CartTotalTooLarge,
}

/// Why a wishlist product could not be moved into the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveToCartError {
    #[error("Product {0} is not in the wishlist")]
    NotInWishlist(ProductId),
    #[error(transparent)]
    Refused(#[from] AddRefusal),
}

/// Cart and wishlist, guarded together.
#[derive(Debug)]
struct Collections {
    cart: Cart,
    wishlist: Wishlist,
    cart_page: Pagination,
}

/// One page of the cart plus its totals, taken under a single lock.
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartEntry>,
    pub page: PageInfo,
    /// Cart total rounded to cents.
    pub total: Decimal,
    pub item_count: u64,
}

/// Shared state container for one shopper.
pub struct ShopContext {
    collections: Mutex<Collections>,
    filters: RwLock<FilterCriteria>,
    categories: RwLock<CategoryState>,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ShopContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopContext")
            .field("collections", &*self.collections.lock())
            .field("filters", &*self.filters.read())
            .field("categories", &*self.categories.read())
            .finish_non_exhaustive()
    }
}

impl ShopContext {
    /// Build the container, loading cart and wishlist from storage.
    ///
    /// Missing keys start empty. Unreadable or corrupt values are logged and
    /// also start empty; loading never fails.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let cart_entries: Vec<CartEntry> = load_or_empty(&*storage, storage_keys::CART_ITEMS);
        let wishlist_items: Vec<Product> =
            load_or_empty(&*storage, storage_keys::WISHLIST_ITEMS);

        let cart = Cart::from_entries(cart_entries);
        let wishlist = Wishlist::from_items(wishlist_items);
        tracing::info!(
            cart_entries = cart.len(),
            wishlist_items = wishlist.len(),
            "Loaded shop state from local storage"
        );

        Self {
            collections: Mutex::new(Collections {
                cart,
                wishlist,
                cart_page: Pagination::new(CART_ITEMS_PER_PAGE),
            }),
            filters: RwLock::new(FilterCriteria::default()),
            categories: RwLock::new(CategoryState::Idle),
            storage,
        }
    }

    fn persist_cart(&self, cart: &Cart) {
        if let Err(e) = save_json(&*self.storage, storage_keys::CART_ITEMS, cart) {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }

    fn persist_wishlist(&self, wishlist: &Wishlist) {
        if let Err(e) = save_json(&*self.storage, storage_keys::WISHLIST_ITEMS, wishlist) {
            tracing::warn!(error = %e, "Failed to persist wishlist");
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of `product` to the cart and return the updated entries.
    ///
    /// An add that would overflow the cart total is dropped with a warning.
    pub fn add_to_cart(&self, product: &Product) -> Vec<CartEntry> {
        let mut guard = self.collections.lock();
        match guard.cart.add(product) {
            Some(quantity) => {
                self.persist_cart(&guard.cart);
                tracing::debug!(product_id = %product.id, quantity, "Added to cart");
            }
            None => {
                tracing::warn!(product_id = %product.id, "Cart total would overflow, add ignored");
            }
        }
        guard.cart.entries().to_vec()
    }

    /// Add `product` to the cart unless it is already there.
    ///
    /// The membership check and the add happen under one lock, so of several
    /// concurrent calls for the same product exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AddRefusal::AlreadyInCart`] if the product is in the cart,
    /// or [`AddRefusal::CartTotalTooLarge`] if the total would overflow.
    pub fn try_add_to_cart(&self, product: &Product) -> Result<Vec<CartEntry>, AddRefusal> {
        let mut guard = self.collections.lock();
        if guard.cart.contains(product.id) {
            return Err(AddRefusal::AlreadyInCart);
        }
        guard
            .cart
            .add(product)
            .ok_or(AddRefusal::CartTotalTooLarge)?;
        self.persist_cart(&guard.cart);
        tracing::debug!(product_id = %product.id, "Added to cart");
        Ok(guard.cart.entries().to_vec())
    }

    /// Set the quantity of a cart entry.
    ///
    /// Quantities of zero or below are silently ignored; use
    /// [`remove_cart_item`](Self::remove_cart_item) to drop an entry.
    pub fn update_cart_item(&self, id: ProductId, quantity: i64) {
        let mut guard = self.collections.lock();
        if guard.cart.update_quantity(id, quantity) {
            self.persist_cart(&guard.cart);
            tracing::debug!(product_id = %id, quantity, "Updated cart quantity");
        }
    }

    /// Remove a product from the cart. Unknown ids are a no-op.
    pub fn remove_cart_item(&self, id: ProductId) {
        let mut guard = self.collections.lock();
        if guard.cart.remove(id) {
            let len = guard.cart.len();
            guard.cart_page.clamp(len);
            self.persist_cart(&guard.cart);
            tracing::debug!(product_id = %id, "Removed from cart");
        }
    }

    #[must_use]
    pub fn is_product_in_cart(&self, id: ProductId) -> bool {
        self.collections.lock().cart.contains(id)
    }

    /// Snapshot of the whole cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.collections.lock().cart.clone()
    }

    /// Sum of price times quantity, unrounded.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.collections.lock().cart.total()
    }

    /// Total units in the cart (navbar badge).
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.collections.lock().cart.item_count()
    }

    // =========================================================================
    // Cart pagination
    // =========================================================================

    /// Cart entries on the current cart page.
    #[must_use]
    pub fn current_items(&self) -> Vec<CartEntry> {
        let guard = self.collections.lock();
        guard.cart_page.slice(guard.cart.entries()).to_vec()
    }

    /// `ceil(cart length / items per page)`.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let guard = self.collections.lock();
        guard.cart_page.total_pages(guard.cart.len())
    }

    /// Move the cart cursor. Pages outside `[1, total_pages]` are a no-op.
    pub fn set_cart_page(&self, page: u32) -> bool {
        let mut guard = self.collections.lock();
        let len = guard.cart.len();
        guard.cart_page.go_to(page, len)
    }

    /// Current cart page with totals, consistent with each other.
    #[must_use]
    pub fn cart_summary(&self) -> CartSummary {
        let guard = self.collections.lock();
        CartSummary {
            items: guard.cart_page.slice(guard.cart.entries()).to_vec(),
            page: guard.cart_page.info(guard.cart.len()),
            total: round_currency(guard.cart.total()),
            item_count: guard.cart.item_count(),
        }
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Save a product to the wishlist. Returns `false` if already saved.
    pub fn add_to_wishlist(&self, product: &Product) -> bool {
        let mut guard = self.collections.lock();
        let added = guard.wishlist.add(product.clone());
        if added {
            self.persist_wishlist(&guard.wishlist);
            tracing::debug!(product_id = %product.id, "Added to wishlist");
        }
        added
    }

    /// Remove a product from the wishlist. Unknown ids are a no-op.
    pub fn remove_from_wishlist(&self, id: ProductId) -> bool {
        let mut guard = self.collections.lock();
        let removed = guard.wishlist.remove(id).is_some();
        if removed {
            self.persist_wishlist(&guard.wishlist);
            tracing::debug!(product_id = %id, "Removed from wishlist");
        }
        removed
    }

    /// Save `product` to the wishlist unless it is in the cart or already
    /// saved. Checked and applied under one lock.
    ///
    /// # Errors
    ///
    /// Returns the refusal matching where the product already is.
    pub fn try_add_to_wishlist(&self, product: &Product) -> Result<(), AddRefusal> {
        let mut guard = self.collections.lock();
        if guard.cart.contains(product.id) {
            return Err(AddRefusal::InCartNotWishlistable);
        }
        if !guard.wishlist.add(product.clone()) {
            return Err(AddRefusal::AlreadyInWishlist);
        }
        self.persist_wishlist(&guard.wishlist);
        tracing::debug!(product_id = %product.id, "Added to wishlist");
        Ok(())
    }

    /// Move a wishlist product into the cart and return the cart entries.
    ///
    /// A product already in the cart gets one more unit, as with any add.
    ///
    /// # Errors
    ///
    /// Returns [`MoveToCartError::NotInWishlist`] if the product is not
    /// saved, or a refusal if the cart total would overflow. Both
    /// collections are unchanged on error.
    pub fn move_to_cart(&self, id: ProductId) -> Result<Vec<CartEntry>, MoveToCartError> {
        let mut guard = self.collections.lock();
        let product = guard
            .wishlist
            .get(id)
            .cloned()
            .ok_or(MoveToCartError::NotInWishlist(id))?;
        guard
            .cart
            .add(&product)
            .ok_or(AddRefusal::CartTotalTooLarge)?;
        guard.wishlist.remove(id);
        self.persist_cart(&guard.cart);
        self.persist_wishlist(&guard.wishlist);
        tracing::debug!(product_id = %id, "Moved wishlist item to cart");
        Ok(guard.cart.entries().to_vec())
    }

    #[must_use]
    pub fn is_product_in_wishlist(&self, id: ProductId) -> bool {
        self.collections.lock().wishlist.contains(id)
    }

    /// Snapshot of the wishlist.
    #[must_use]
    pub fn wishlist(&self) -> Wishlist {
        self.collections.lock().wishlist.clone()
    }

    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.collections.lock().wishlist.len()
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Snapshot of the current filter criteria.
    #[must_use]
    pub fn filters(&self) -> FilterCriteria {
        self.filters.read().clone()
    }

    /// Select a category; `None` or a blank string selects all.
    pub fn set_selected_category(&self, category: Option<String>) {
        self.filters.write().selected_category = filter::normalize_category(category);
    }

    pub fn set_price_range(&self, range: PriceRange) {
        self.filters.write().price_range = range;
    }

    pub fn set_search_term(&self, term: String) {
        self.filters.write().search_term = term;
    }

    /// Restore the default criteria.
    pub fn reset_filters(&self) {
        *self.filters.write() = FilterCriteria::default();
    }

    /// Apply the current category and price filters to a product list.
    #[must_use]
    pub fn filter_products(&self, products: &[Product]) -> Vec<Product> {
        self.filters.read().apply(products)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Snapshot of the category load state.
    #[must_use]
    pub fn categories(&self) -> CategoryState {
        self.categories.read().clone()
    }

    /// Fetch the category list once.
    ///
    /// Only runs from `Idle`; any later call returns the current state
    /// without fetching again. Failure is terminal and recorded as a
    /// user-visible message. Cart and wishlist are unaffected either way.
    pub async fn load_categories(&self, catalog: &CatalogClient) -> CategoryState {
        {
            let mut state = self.categories.write();
            if *state != CategoryState::Idle {
                return state.clone();
            }
            *state = CategoryState::Loading;
        }

        let next = match catalog.get_categories().await {
            Ok(categories) => {
                tracing::info!(count = categories.len(), "Loaded categories");
                CategoryState::Loaded { categories }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading categories");
                CategoryState::Failed {
                    error: format!("Error: {e}"),
                }
            }
        };

        let mut state = self.categories.write();
        *state = next;
        state.clone()
    }
}

/// Load a stored JSON array, treating any failure as empty.
fn load_or_empty<T: serde::de::DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    match load_json::<Vec<T>>(store, key) {
        Ok(items) => items.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, key, "Ignoring unreadable stored value");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use url::Url;
    use zudio_core::Price;

    use super::*;
    use crate::config::CatalogConfig;
    use crate::storage::MemoryStore;

    fn product(id: i64, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::new(Decimal::from(price)).unwrap(),
            description: String::new(),
            category: "electronics".to_string(),
            image: String::new(),
            discount: None,
        }
    }

    fn shop() -> (Arc<MemoryStore>, ShopContext) {
        let store = Arc::new(MemoryStore::new());
        let shop = ShopContext::load(store.clone());
        (store, shop)
    }

    #[test]
    fn test_add_to_cart_twice_yields_one_entry() {
        let (_, shop) = shop();
        shop.add_to_cart(&product(1, 10));
        let entries = shop.add_to_cart(&product(1, 10));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 2);
    }

    #[test]
    fn test_update_cart_item_non_positive_is_ignored() {
        let (_, shop) = shop();
        shop.add_to_cart(&product(1, 10));
        shop.update_cart_item(ProductId::new(1), 0);
        shop.update_cart_item(ProductId::new(1), -1);
        assert_eq!(shop.cart().get(ProductId::new(1)).unwrap().quantity, 1);
    }

    #[test]
    fn test_total_for_price_ten_quantity_three() {
        let (_, shop) = shop();
        shop.add_to_cart(&product(1, 10));
        shop.update_cart_item(ProductId::new(1), 3);
        assert_eq!(shop.total(), Decimal::from(30));
        assert_eq!(shop.cart_count(), 3);
    }

    #[test]
    fn test_remove_nonexistent_is_noop() {
        let (_, shop) = shop();
        shop.add_to_cart(&product(1, 10));
        shop.add_to_wishlist(&product(2, 5));
        shop.remove_cart_item(ProductId::new(9));
        assert!(!shop.remove_from_wishlist(ProductId::new(9)));
        assert_eq!(shop.cart().len(), 1);
        assert_eq!(shop.wishlist_count(), 1);
    }

    #[test]
    fn test_wishlist_never_duplicates() {
        let (_, shop) = shop();
        assert!(shop.add_to_wishlist(&product(1, 10)));
        assert!(!shop.add_to_wishlist(&product(1, 10)));
        assert!(!shop.add_to_wishlist(&product(1, 10)));
        assert_eq!(shop.wishlist_count(), 1);
    }

    #[test]
    fn test_add_refusals() {
        let (_, shop) = shop();
        shop.try_add_to_cart(&product(1, 10)).unwrap();
        shop.try_add_to_wishlist(&product(2, 5)).unwrap();

        assert_eq!(
            shop.try_add_to_cart(&product(1, 10)),
            Err(AddRefusal::AlreadyInCart)
        );
        assert_eq!(shop.cart().get(ProductId::new(1)).unwrap().quantity, 1);
        assert_eq!(
            shop.try_add_to_wishlist(&product(1, 10)),
            Err(AddRefusal::InCartNotWishlistable)
        );
        assert_eq!(
            shop.try_add_to_wishlist(&product(2, 5)),
            Err(AddRefusal::AlreadyInWishlist)
        );
        assert!(!shop.is_product_in_wishlist(ProductId::new(1)));
        assert_eq!(
            AddRefusal::InCartNotWishlistable.to_string(),
            "This item is already in your cart, cannot be added to wishlist!"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checked_adds_admit_one() {
        let (_, shop) = shop();
        let shop = Arc::new(shop);
        let p = product(9, 10);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let shop = shop.clone();
                let p = p.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        shop.try_add_to_cart(&p).is_ok()
                    } else {
                        shop.try_add_to_wishlist(&p).is_ok()
                    }
                })
            })
            .collect();
        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        // Either the cart or the wishlist won; never both, never twice.
        assert_eq!(admitted, 1);
        let in_cart = shop.is_product_in_cart(p.id);
        assert_ne!(in_cart, shop.is_product_in_wishlist(p.id));
        if in_cart {
            assert_eq!(shop.cart().get(p.id).unwrap().quantity, 1);
        }
    }

    #[test]
    fn test_overflowing_quantity_is_ignored_and_survives_reload() {
        let (store, shop) = shop();
        let mut pricey = product(1, 0);
        pricey.price = Price::new("100000000000000000000".parse().unwrap()).unwrap();
        shop.add_to_cart(&pricey);

        shop.update_cart_item(pricey.id, i64::from(u32::MAX));
        let summary = shop.cart_summary();
        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.total, pricey.price.amount());
        drop(shop);

        let reloaded = ShopContext::load(store);
        assert_eq!(reloaded.total(), pricey.price.amount());
        assert_eq!(reloaded.cart_count(), 1);
    }

    #[test]
    fn test_state_survives_reload() {
        let (store, shop) = shop();
        shop.add_to_cart(&product(1, 10));
        shop.add_to_cart(&product(1, 10));
        shop.add_to_wishlist(&product(2, 5));
        drop(shop);

        let reloaded = ShopContext::load(store);
        assert_eq!(reloaded.cart().get(ProductId::new(1)).unwrap().quantity, 2);
        assert!(reloaded.is_product_in_wishlist(ProductId::new(2)));
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(storage_keys::CART_ITEMS, "{not json").unwrap();
        let shop = ShopContext::load(store);
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn test_move_to_cart() {
        let (_, shop) = shop();
        shop.add_to_wishlist(&product(4, 20));
        let entries = shop.move_to_cart(ProductId::new(4)).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!shop.is_product_in_wishlist(ProductId::new(4)));
        assert!(shop.is_product_in_cart(ProductId::new(4)));
        assert_eq!(
            shop.move_to_cart(ProductId::new(4)),
            Err(MoveToCartError::NotInWishlist(ProductId::new(4)))
        );
    }

    #[test]
    fn test_move_to_cart_when_also_in_cart() {
        let (store, shop) = shop();
        shop.add_to_wishlist(&product(9, 64));
        shop.add_to_cart(&product(9, 64));

        let entries = shop.move_to_cart(ProductId::new(9)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 2);
        assert_eq!(shop.wishlist_count(), 0);

        let stored: Vec<Product> = load_json(&*store, storage_keys::WISHLIST_ITEMS)
            .unwrap()
            .unwrap();
        assert!(stored.is_empty());
    }

    #[test]
    fn test_cart_pagination() {
        let (_, shop) = shop();
        for id in 1..=25 {
            shop.add_to_cart(&product(id, 1));
        }
        assert_eq!(shop.total_pages(), 3);
        assert_eq!(shop.current_items().len(), 10);
        assert!(!shop.set_cart_page(4));
        assert!(shop.set_cart_page(3));
        assert_eq!(shop.current_items().len(), 5);

        let summary = shop.cart_summary();
        assert_eq!(summary.page.page_numbers, vec![1, 2, 3]);
        assert_eq!(summary.total, Decimal::from(25));

        // Emptying the last page pulls the cursor back.
        for id in 21..=25 {
            shop.remove_cart_item(ProductId::new(id));
        }
        assert_eq!(shop.cart_summary().page.current_page, 2);
    }

    #[test]
    fn test_filters() {
        let (_, shop) = shop();
        shop.set_selected_category(Some("jewelery".to_string()));
        shop.set_price_range(PriceRange::new(Decimal::ZERO, Decimal::from(50)));
        shop.set_search_term("ring".to_string());
        let filters = shop.filters();
        assert_eq!(filters.selected_category.as_deref(), Some("jewelery"));
        assert_eq!(filters.search_term, "ring");

        shop.set_selected_category(Some(String::new()));
        assert!(shop.filters().selected_category.is_none());

        shop.reset_filters();
        assert_eq!(shop.filters(), FilterCriteria::default());
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let (_, shop) = shop();
        let shop = Arc::new(shop);
        let p = product(1, 10);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let shop = shop.clone();
                let p = p.clone();
                tokio::spawn(async move {
                    shop.add_to_cart(&p);
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let cart = shop.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(p.id).unwrap().quantity, 50);
    }

    #[tokio::test]
    async fn test_category_failure_is_terminal_and_isolated() {
        let (_, shop) = shop();
        shop.add_to_cart(&product(1, 10));

        // Nothing listens on port 9; the request fails fast.
        let mut config = CatalogConfig::with_base_url(Url::parse("http://127.0.0.1:9").unwrap());
        config.timeout = Duration::from_secs(2);
        let catalog = CatalogClient::new(&config).unwrap();

        let state = shop.load_categories(&catalog).await;
        let error = state.error().unwrap();
        assert!(error.starts_with("Error: "));

        // No retry: the second call reports the same failure.
        assert_eq!(shop.load_categories(&catalog).await, state);
        assert_eq!(shop.cart().len(), 1);
    }
}
