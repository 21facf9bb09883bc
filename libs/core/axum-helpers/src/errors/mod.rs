pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Body of every error response.
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Request validation failed",
///   "error": "price: price must not be negative"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error identifier
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional detail describing what was wrong with the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// 4xx variants echo their message to the client. 5xx variants log their
/// detail and answer with the code's generic message only.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Path extraction error: {0}")]
    PathExtractorRejection(#[from] PathRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {message}")]
    BadRequest {
        message: String,
        error: Option<String>,
    },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// 400 carrying both a summary and a detail string.
    pub fn invalid(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            error: Some(error.into()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::JsonExtractorRejection(rejection) => match rejection {
                JsonRejection::JsonDataError(_) => ErrorCode::ValidationError,
                _ => ErrorCode::InvalidJson,
            },
            AppError::PathExtractorRejection(_) => ErrorCode::BadRequest,
            AppError::ValidationError(_) => ErrorCode::ValidationError,
            AppError::InvalidId(_) => ErrorCode::InvalidId,
            AppError::BadRequest { .. } => ErrorCode::BadRequest,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Database(_) => ErrorCode::DatabaseError,
        }
    }

    fn into_body(self) -> ErrorResponse {
        let code = self.code();

        match self {
            AppError::JsonExtractorRejection(rejection) => {
                ErrorResponse::new(code, code.default_message()).with_error(rejection.body_text())
            }
            AppError::PathExtractorRejection(rejection) => {
                ErrorResponse::new(code, rejection.body_text())
            }
            AppError::ValidationError(errors) => ErrorResponse::new(code, code.default_message())
                .with_error(format_validation_errors(&errors)),
            AppError::InvalidId(raw) => {
                ErrorResponse::new(code, format!("Invalid id format: '{}'", raw))
            }
            AppError::BadRequest { message, error } => ErrorResponse {
                code,
                message,
                error,
            },
            AppError::NotFound(message) => ErrorResponse::new(code, message),
            AppError::Database(_) => ErrorResponse::new(code, code.default_message()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        if code.is_server_error() {
            tracing::error!(error_code = %code, error = %self, "Request failed");
        } else {
            tracing::info!(error_code = %code, error = %self, "Request rejected");
        }

        (code.status(), Json(self.into_body())).into_response()
    }
}

/// Flatten validator errors into a single `field: message` line per failure,
/// sorted by field name.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut lines = Vec::new();
    collect_validation_errors(errors, "", &mut lines);
    lines.sort();
    lines.join("; ")
}

fn collect_validation_errors(errors: &ValidationErrors, prefix: &str, lines: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", err.code));
                    lines.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_validation_errors(nested, &path, lines),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_errors(nested, &format!("{}[{}]", path, index), lines);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};
    use validator::ValidationError;

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_echoes_message() {
        let (status, body) = body_of(AppError::NotFound("Product not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_database_error_hides_detail() {
        let (status, body) =
            body_of(AppError::Database("connection refused 10.0.0.3:27017".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], ErrorCode::DatabaseError.default_message());
        assert!(!body.to_string().contains("10.0.0.3"));
    }

    #[tokio::test]
    async fn test_invalid_id_is_400() {
        let (status, body) = body_of(AppError::InvalidId("abc".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ID");
        assert!(body["message"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn test_invalid_carries_error_detail() {
        let (status, body) = body_of(AppError::invalid("Invalid stock status", "bogus")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid stock status");
        assert_eq!(body["error"], "bogus");
    }

    #[test]
    fn test_format_validation_errors_is_sorted() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "price",
            ValidationError::new("range").with_message("price must not be negative".into()),
        );
        errors.add("productName", ValidationError::new("length"));

        assert_eq!(
            format_validation_errors(&errors),
            "price: price must not be negative; productName: failed 'length' check"
        );
    }
}
