//! Wishlist commands.
//!
//! # Usage
//!
//! ```bash
//! zudio wishlist show
//! zudio wishlist add 3
//! zudio wishlist remove 3
//! zudio wishlist move 3
//! ```

use std::io::Write;

use zudio_core::ProductId;

use super::{CliError, Session};
use crate::view;

/// Print the wishlist.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn show<W: Write>(session: &Session, out: &mut W) -> Result<(), CliError> {
    view::write_wishlist(out, session.shop.wishlist().items())?;
    Ok(())
}

/// Save a product to the wishlist.
///
/// # Errors
///
/// Returns an error if the product is already in the cart or wishlist, or
/// cannot be fetched, or if output fails.
pub async fn add<W: Write>(session: &Session, id: ProductId, out: &mut W) -> Result<(), CliError> {
    let product = session.catalog.get_product(id).await?;
    session.shop.try_add_to_wishlist(&product)?;

    writeln!(out, "Item added to wishlist!")?;
    Ok(())
}

/// Remove a product from the wishlist.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn remove<W: Write>(session: &Session, id: ProductId, out: &mut W) -> Result<(), CliError> {
    session.shop.remove_from_wishlist(id);
    writeln!(out, "Item removed from wishlist!")?;
    Ok(())
}

/// Move a wishlist product into the cart.
///
/// A product that is also in the cart gets one more unit there.
///
/// # Errors
///
/// Returns an error if the product is not in the wishlist, or if output
/// fails.
pub fn move_to_cart<W: Write>(
    session: &Session,
    id: ProductId,
    out: &mut W,
) -> Result<(), CliError> {
    session.shop.move_to_cart(id)?;
    writeln!(out, "Item added to cart!")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use zudio_core::{Price, Product};

    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::new(Decimal::from(25)).unwrap(),
            description: String::new(),
            category: "electronics".to_string(),
            image: String::new(),
            discount: None,
        }
    }

    #[test]
    fn test_move_to_cart_when_already_in_cart() {
        let session = Session::in_memory();
        session.shop.add_to_wishlist(&product(9));
        session.shop.add_to_cart(&product(9));

        let mut out = Vec::new();
        move_to_cart(&session, ProductId::new(9), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Item added to cart!\n");
        assert_eq!(session.shop.cart().get(ProductId::new(9)).unwrap().quantity, 2);
        assert_eq!(session.shop.wishlist_count(), 0);
    }

    #[test]
    fn test_move_unknown_is_an_error() {
        let session = Session::in_memory();
        let mut out = Vec::new();
        let err = move_to_cart(&session, ProductId::new(4), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "Product 4 is not in the wishlist");
        assert!(out.is_empty());
    }
}
