//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # First page of everything
//! zudio products
//!
//! # Electronics up to $50, page 2
//! zudio products --category electronics --max-price 50 --page 2
//!
//! # Product detail and categories
//! zudio product 9
//! zudio categories
//!
//! # Title search
//! zudio search backpack
//! ```

use std::io::Write;

use rust_decimal::Decimal;
use zudio_core::filter::{self, PriceRange};
use zudio_core::pagination::CATALOG_ITEMS_PER_PAGE;
use zudio_core::{Pagination, ProductId};

use super::{CliError, Session};
use crate::view;

/// Filters and page for a catalog listing.
#[derive(Debug, Default)]
pub struct ListingArgs {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub page: u32,
}

/// Print one page of the filtered catalog.
///
/// # Errors
///
/// Returns an error if the price range is invalid or output fails. A
/// catalog failure is logged and shown as an empty listing.
pub async fn products<W: Write>(
    session: &Session,
    args: ListingArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let defaults = PriceRange::default();
    let range = PriceRange::checked(
        args.min_price.unwrap_or(defaults.min),
        args.max_price.unwrap_or(defaults.max),
    )?;
    session.shop.set_selected_category(args.category);
    session.shop.set_price_range(range);

    let products = session.catalog.get_products_or_empty().await;
    let visible = session.shop.filter_products(&products);

    let cursor = Pagination::at(CATALOG_ITEMS_PER_PAGE, args.page, visible.len());
    let rows: Vec<_> = cursor
        .slice(&visible)
        .iter()
        .map(|p| (p.clone(), session.marks(p.id)))
        .collect();

    view::write_catalog(out, &rows, &cursor.info(visible.len()))?;
    Ok(())
}

/// Print a product with same-category products.
///
/// # Errors
///
/// Returns an error if the product does not exist, the catalog request
/// fails or output fails.
pub async fn product<W: Write>(
    session: &Session,
    id: ProductId,
    out: &mut W,
) -> Result<(), CliError> {
    let product = session.catalog.get_product(id).await?;
    let products = session.catalog.get_products_or_empty().await;
    let related = filter::related(&products, &product);

    view::write_product_detail(out, &product, session.marks(id), &related)?;
    Ok(())
}

/// Print the category list.
///
/// # Errors
///
/// Returns an error if output fails. A catalog failure is printed as the
/// category error message.
pub async fn categories<W: Write>(session: &Session, out: &mut W) -> Result<(), CliError> {
    let state = session.shop.load_categories(&session.catalog).await;
    view::write_categories(out, &state)?;
    Ok(())
}

/// Print products whose title contains `query`.
///
/// Queries of two characters or fewer are not searched.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn search<W: Write>(session: &Session, query: &str, out: &mut W) -> Result<(), CliError> {
    if !filter::wants_suggestions(query) {
        writeln!(
            out,
            "Type at least {} characters to search.",
            filter::SUGGESTION_MIN_EXCLUSIVE_LEN + 1
        )?;
        return Ok(());
    }

    session.shop.set_search_term(query.to_string());
    let products = session.catalog.get_products_or_empty().await;
    let found = filter::search_titles(&products, &session.shop.filters().search_term);
    if found.is_empty() {
        writeln!(out, "No results found")?;
        return Ok(());
    }

    let rows: Vec<_> = found
        .into_iter()
        .map(|p| {
            let marks = session.marks(p.id);
            (p, marks)
        })
        .collect();
    view::write_product_list(out, &rows)?;
    Ok(())
}
