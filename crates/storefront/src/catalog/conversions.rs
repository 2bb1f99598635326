//! Conversions from catalog wire types to domain types.
//!
//! The catalog serves prices and discounts as JSON floats; the domain keeps
//! them as decimals. Each float goes through its shortest round-trip string
//! form so `109.95` becomes exactly `109.95`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use zudio_core::{Discount, DiscountError, Price, PriceError, Product, ProductId};

/// A product as returned by the catalog API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProduct {
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub discount: Option<f64>,
}

/// A catalog product that cannot be represented in the domain model.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("product {id}: price {value} is not a finite decimal")]
    NotDecimal { id: i64, value: f64 },
    #[error("product {id}: {source}")]
    Price {
        id: i64,
        #[source]
        source: PriceError,
    },
    #[error("product {id}: {source}")]
    Discount {
        id: i64,
        #[source]
        source: DiscountError,
    },
}

fn to_decimal(id: i64, value: f64) -> Result<Decimal, ConversionError> {
    if !value.is_finite() {
        return Err(ConversionError::NotDecimal { id, value });
    }
    Decimal::from_str(&value.to_string()).map_err(|_| ConversionError::NotDecimal { id, value })
}

/// Convert a catalog product into a domain product.
///
/// # Errors
///
/// Returns an error if the price is negative or not representable, or if
/// the discount lies outside [0, 100).
pub fn convert_product(api: ApiProduct) -> Result<Product, ConversionError> {
    let id = api.id;
    let price = Price::new(to_decimal(id, api.price)?)
        .map_err(|source| ConversionError::Price { id, source })?;
    let discount = api
        .discount
        .map(|value| {
            Discount::new(to_decimal(id, value)?)
                .map_err(|source| ConversionError::Discount { id, source })
        })
        .transpose()?;

    Ok(Product {
        id: ProductId::new(id),
        title: api.title,
        price,
        description: api.description,
        category: api.category,
        image: api.image,
        discount,
    })
}

/// Convert a product list, dropping (and logging) unrepresentable entries.
pub fn convert_products(api: Vec<ApiProduct>) -> Vec<Product> {
    api.into_iter()
        .filter_map(|product| match convert_product(product) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping invalid catalog product");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn api(price: f64, discount: Option<f64>) -> ApiProduct {
        ApiProduct {
            id: 1,
            title: "Backpack".to_string(),
            price,
            description: String::new(),
            category: "men's clothing".to_string(),
            image: String::new(),
            discount,
        }
    }

    #[test]
    fn test_price_is_exact() {
        let product = convert_product(api(109.95, None)).unwrap();
        assert_eq!(product.price.amount(), Decimal::from_str("109.95").unwrap());
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            convert_product(api(-1.0, None)),
            Err(ConversionError::Price { id: 1, .. })
        ));
    }

    #[test]
    fn test_discount_out_of_range_rejected() {
        assert!(matches!(
            convert_product(api(10.0, Some(100.0))),
            Err(ConversionError::Discount { .. })
        ));
        let product = convert_product(api(10.0, Some(15.0))).unwrap();
        assert!(product.has_discount());
    }

    #[test]
    fn test_convert_products_skips_invalid() {
        let products = convert_products(vec![api(1.0, None), api(f64::NAN, None)]);
        assert_eq!(products.len(), 1);
    }
}
