use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use bson::oid::ObjectId;
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::StockStatus;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(ObjectId),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid stock status: '{0}'")]
    InvalidStockStatus(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::NotFound("Product not found".to_string()),
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::InvalidStockStatus(raw) => AppError::invalid(
                "Invalid stock status",
                format!(
                    "'{}' is not one of {}",
                    raw,
                    StockStatus::allowed_values()
                ),
            ),
            ProductError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_helpers::ErrorCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProductError::NotFound(ObjectId::new()), StatusCode::NOT_FOUND),
            (
                ProductError::Validation(ValidationErrors::new()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ProductError::InvalidStockStatus("bogus".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ProductError::Database("socket closed".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_database_error_maps_to_database_code() {
        let app_error = AppError::from(ProductError::Database("boom".into()));
        assert_eq!(app_error.code(), ErrorCode::DatabaseError);
    }
}
