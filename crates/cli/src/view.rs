//! Plain-text rendering of catalog, cart and wishlist views.

use std::io::{self, Write};

use zudio_core::types::price::format_currency;
use zudio_core::{PageInfo, Product, SLIDER_TITLE_CHARS, WISHLIST_TITLE_CHARS};
use zudio_storefront::shop::{CartSummary, CategoryState};

/// Price column: the discounted price, with the original when discounted.
#[must_use]
pub fn price_label(product: &Product) -> String {
    let current = format_currency(product.discounted_price().amount());
    match product.discount {
        Some(discount) if product.has_discount() => format!(
            "{current} ({discount}, was {})",
            format_currency(product.price.amount())
        ),
        _ => current,
    }
}

/// Page bar such as `Page 4 of 9: 1 2 3 [4] 5 6 ... 9`.
#[must_use]
pub fn page_bar(page: &PageInfo) -> String {
    let mut bar = format!("Page {} of {}:", page.current_page, page.total_pages);
    let mut previous = 0;
    for &number in &page.page_numbers {
        if number > previous + 1 {
            bar.push_str(" ...");
        }
        if number == page.current_page {
            bar.push_str(&format!(" [{number}]"));
        } else {
            bar.push_str(&format!(" {number}"));
        }
        previous = number;
    }
    bar
}

/// Flags shown next to a product in listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Marks {
    pub in_cart: bool,
    pub in_wishlist: bool,
}

impl Marks {
    fn suffix(self) -> &'static str {
        match (self.in_cart, self.in_wishlist) {
            (true, true) => "  [cart] [wishlist]",
            (true, false) => "  [cart]",
            (false, true) => "  [wishlist]",
            (false, false) => "",
        }
    }
}

/// One line per product.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_product_list<W: Write>(
    out: &mut W,
    products: &[(Product, Marks)],
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }
    for (product, marks) in products {
        writeln!(
            out,
            "#{:<4} {}  {}{}",
            product.id.as_i64(),
            product.title,
            price_label(product),
            marks.suffix()
        )?;
    }
    Ok(())
}

/// A catalog page with its page bar.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_catalog<W: Write>(
    out: &mut W,
    products: &[(Product, Marks)],
    page: &PageInfo,
) -> io::Result<()> {
    write_product_list(out, products)?;
    if page.total_pages > 1 {
        writeln!(out)?;
        writeln!(out, "{}", page_bar(page))?;
    }
    Ok(())
}

/// Product detail with the related-products slider.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_product_detail<W: Write>(
    out: &mut W,
    product: &Product,
    marks: Marks,
    related: &[Product],
) -> io::Result<()> {
    writeln!(out, "{}{}", product.title, marks.suffix())?;
    writeln!(out, "Category: {}", product.category)?;
    writeln!(out, "Price:    {}", price_label(product))?;
    writeln!(out, "Image:    {}", product.image)?;
    writeln!(out)?;
    writeln!(out, "{}", product.description)?;

    if !related.is_empty() {
        writeln!(out)?;
        writeln!(out, "More in {}:", product.category)?;
        for p in related {
            writeln!(
                out,
                "  #{:<4} {}  {}",
                p.id.as_i64(),
                p.short_title(SLIDER_TITLE_CHARS),
                format_currency(p.discounted_price().amount())
            )?;
        }
    }
    Ok(())
}

/// The category list, or its load state.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_categories<W: Write>(out: &mut W, state: &CategoryState) -> io::Result<()> {
    if let Some(error) = state.error() {
        return writeln!(out, "{error}");
    }
    if state.is_loading() {
        return writeln!(out, "Loading categories...");
    }
    writeln!(out, "All")?;
    for category in state.categories() {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

/// One cart page with line totals and the cart total.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_cart<W: Write>(out: &mut W, cart: &CartSummary) -> io::Result<()> {
    if cart.items.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }
    for entry in &cart.items {
        writeln!(
            out,
            "#{:<4} {} x {}  {}",
            entry.id().as_i64(),
            entry.quantity,
            entry.product.title,
            format_currency(entry.line_total())
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Items: {}  Total: {}",
        cart.item_count,
        format_currency(cart.total)
    )?;
    if cart.page.total_pages > 1 {
        writeln!(out, "{}", page_bar(&cart.page))?;
    }
    Ok(())
}

/// The wishlist with shortened titles.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_wishlist<W: Write>(out: &mut W, items: &[Product]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "Your wishlist is empty.");
    }
    for product in items {
        writeln!(
            out,
            "#{:<4} {}  {}",
            product.id.as_i64(),
            product.short_title(WISHLIST_TITLE_CHARS),
            price_label(product)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{} saved", items.len())
}
