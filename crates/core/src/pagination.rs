//! Page math and page-number display sets.

use std::num::NonZeroU32;
use std::ops::Range;

use serde::Serialize;

/// Pages shown on either side of the current page.
pub const PAGE_RADIUS: u32 = 2;

/// Items per page in the cart view.
pub const CART_ITEMS_PER_PAGE: NonZeroU32 = NonZeroU32::new(10).expect("non-zero");

/// Items per page in the catalog view.
pub const CATALOG_ITEMS_PER_PAGE: NonZeroU32 = NonZeroU32::new(12).expect("non-zero");

/// `ceil(total_items / items_per_page)`.
#[must_use]
pub fn total_pages(total_items: usize, items_per_page: NonZeroU32) -> u32 {
    let per_page = u64::from(items_per_page.get());
    let total = u64::try_from(total_items).unwrap_or(u64::MAX);
    u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX)
}

/// Page numbers to display: the first page, the last page, and every page
/// within [`PAGE_RADIUS`] of the current one, ascending.
#[must_use]
pub fn page_numbers(current_page: u32, total_pages: u32) -> Vec<u32> {
    let low = current_page.saturating_sub(PAGE_RADIUS);
    let high = current_page.saturating_add(PAGE_RADIUS);
    (1..=total_pages)
        .filter(|&page| page == 1 || page == total_pages || (low..=high).contains(&page))
        .collect()
}

/// A pagination cursor: current page plus a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    items_per_page: NonZeroU32,
}

impl Pagination {
    /// A cursor on page 1.
    #[must_use]
    pub const fn new(items_per_page: NonZeroU32) -> Self {
        Self {
            current_page: 1,
            items_per_page,
        }
    }

    /// A cursor on the requested page of a collection of `total_items`.
    ///
    /// The page is clamped into `[1, total_pages]` (page 1 for an empty
    /// collection), so the cursor always describes a page that exists.
    #[must_use]
    pub fn at(items_per_page: NonZeroU32, page: u32, total_items: usize) -> Self {
        let mut cursor = Self {
            current_page: page.max(1),
            items_per_page,
        };
        cursor.clamp(total_items);
        cursor
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub const fn items_per_page(&self) -> NonZeroU32 {
        self.items_per_page
    }

    #[must_use]
    pub fn total_pages(&self, total_items: usize) -> u32 {
        total_pages(total_items, self.items_per_page)
    }

    /// Move to `page` if it lies in `[1, total_pages]`.
    ///
    /// Returns whether the cursor moved; out-of-range requests are no-ops.
    pub fn go_to(&mut self, page: u32, total_items: usize) -> bool {
        if page < 1 || page > self.total_pages(total_items) || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Move to the next page if there is one.
    pub fn next(&mut self, total_items: usize) -> bool {
        self.go_to(self.current_page.saturating_add(1), total_items)
    }

    /// Move to the previous page if there is one.
    pub fn previous(&mut self, total_items: usize) -> bool {
        self.go_to(self.current_page.saturating_sub(1), total_items)
    }

    /// Pull the cursor back onto the last page after the collection shrank.
    pub fn clamp(&mut self, total_items: usize) {
        let last = self.total_pages(total_items).max(1);
        if self.current_page > last {
            self.current_page = last;
        }
    }

    /// Index range of the current page within a collection.
    #[must_use]
    pub fn window(&self, total_items: usize) -> Range<usize> {
        let per_page = self.items_per_page.get() as usize;
        let start = (self.current_page as usize - 1)
            .saturating_mul(per_page)
            .min(total_items);
        let end = start.saturating_add(per_page).min(total_items);
        start..end
    }

    /// The items on the current page.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.window(items.len())).unwrap_or_default()
    }

    /// Summary of the cursor over a collection of `total_items`.
    #[must_use]
    pub fn info(&self, total_items: usize) -> PageInfo {
        let total_pages = self.total_pages(total_items);
        PageInfo {
            current_page: self.current_page,
            items_per_page: self.items_per_page.get(),
            total_items,
            total_pages,
            page_numbers: page_numbers(self.current_page, total_pages),
            has_previous: self.current_page > 1,
            has_next: self.current_page < total_pages,
        }
    }
}

/// Serializable pagination summary for views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: usize,
    pub total_pages: u32,
    pub page_numbers: Vec<u32>,
    pub has_previous: bool,
    pub has_next: bool,
}
