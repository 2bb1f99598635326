//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! zudio cart show --page 2
//! zudio cart add 9
//! zudio cart update 9 3
//! zudio cart remove 9
//! ```

use std::io::Write;

use zudio_core::ProductId;

use super::{CliError, Session};
use crate::view;

/// Print one page of the cart.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn show<W: Write>(session: &Session, page: u32, out: &mut W) -> Result<(), CliError> {
    if !session.shop.set_cart_page(page) && page != 1 {
        tracing::warn!(page, "Cart page out of range, showing page 1");
    }
    view::write_cart(out, &session.shop.cart_summary())?;
    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the product is already in the cart or cannot be
/// fetched, or if output fails.
pub async fn add<W: Write>(session: &Session, id: ProductId, out: &mut W) -> Result<(), CliError> {
    let product = session.catalog.get_product(id).await?;
    session.shop.try_add_to_cart(&product)?;

    writeln!(out, "Item added to cart!")?;
    Ok(())
}

/// Set the quantity of a cart line.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn update<W: Write>(
    session: &Session,
    id: ProductId,
    quantity: i64,
    out: &mut W,
) -> Result<(), CliError> {
    if quantity <= 0 {
        tracing::warn!(quantity, "Ignoring non-positive quantity");
    }
    session.shop.update_cart_item(id, quantity);
    view::write_cart(out, &session.shop.cart_summary())?;
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn remove<W: Write>(session: &Session, id: ProductId, out: &mut W) -> Result<(), CliError> {
    session.shop.remove_cart_item(id);
    writeln!(out, "Item removed from cart!")?;
    Ok(())
}
