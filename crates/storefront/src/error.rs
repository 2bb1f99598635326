//! HTTP-facing errors.
//!
//! Handlers return [`Result`]; [`AppError`] turns into a JSON body of the
//! form `{"error": "<message>"}` with a matching status code. Catalog
//! failures are reported to Sentry and shown to the shopper without detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use zudio_core::{PriceRangeError, ProductId};

use crate::catalog::CatalogError;
use crate::shop::{AddRefusal, MoveToCartError};

/// Why a storefront request failed.
#[derive(Debug, Error)]
pub enum AppError {
    /// The remote catalog failed or answered nonsense.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or contradictory input, such as an inverted price range.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The product is already where the shopper tried to put it.
    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    /// Status code sent to the client.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Message sent to the client. Upstream failure detail stays in the logs.
    fn client_message(&self) -> String {
        match self {
            Self::Catalog(CatalogError::NotFound(what)) => format!("Not found: {what}"),
            Self::Catalog(_) => "The product catalog is unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::BAD_GATEWAY {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Catalog request failed"
            );
        }

        let body = ErrorBody {
            error: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AddRefusal> for AppError {
    fn from(refusal: AddRefusal) -> Self {
        Self::Conflict(refusal.to_string())
    }
}

impl From<MoveToCartError> for AppError {
    fn from(err: MoveToCartError) -> Self {
        match err {
            MoveToCartError::NotInWishlist(_) => Self::NotFound(err.to_string()),
            MoveToCartError::Refused(refusal) => refusal.into(),
        }
    }
}

impl From<PriceRangeError> for AppError {
    fn from(err: PriceRangeError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Record a cart or wishlist action so Sentry reports show what the
/// shopper did before an error.
pub fn shopper_breadcrumb(category: &str, message: &str, product_id: ProductId) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };
    breadcrumb
        .data
        .insert("product_id".to_string(), product_id.as_i64().into());

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_conflict_displays_bare_message() {
        let err = AppError::Conflict("This item is already in your cart!".to_string());
        assert_eq!(err.to_string(), "This item is already in your cart!");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("product 123".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::BadRequest("inverted".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Conflict("dup".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Catalog(CatalogError::Api {
                status: 500,
                message: "down".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_add_refusal_is_conflict() {
        let err = AppError::from(AddRefusal::AlreadyInWishlist);
        assert_eq!(err.to_string(), "This item is already in your wishlist!");
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_move_to_cart_errors() {
        let missing = AppError::from(MoveToCartError::NotInWishlist(ProductId::new(7)));
        assert_eq!(missing.to_string(), "Not found: Product 7 is not in the wishlist");
        assert_eq!(status_of(missing), StatusCode::NOT_FOUND);

        let refused = AppError::from(MoveToCartError::Refused(AddRefusal::CartTotalTooLarge));
        assert_eq!(status_of(refused), StatusCode::CONFLICT);
    }

    #[test]
    fn test_catalog_not_found_maps_to_404() {
        let err = AppError::Catalog(CatalogError::NotFound("Product not found: 9".to_string()));
        assert_eq!(err.client_message(), "Not found: Product not found: 9");
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_detail_is_hidden() {
        let err = AppError::Catalog(CatalogError::Api {
            status: 503,
            message: "upstream exploded at 10.0.0.7".to_string(),
        });
        assert_eq!(err.client_message(), "The product catalog is unavailable");
    }
}
