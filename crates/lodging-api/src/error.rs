//! Maps engine and core errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use lodging_core::error::{AppError, ErrorKind};
use lodging_engine::BookingError;

/// Error body nested under `"error"` in failed responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Structured reason, when the error carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    details: Option<serde_json::Value>,
}

impl ApiError {
    /// The underlying error.
    pub fn inner(&self) -> &AppError {
        &self.error
    }

    /// HTTP status for an error kind.
    pub fn status_for(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::Validation | ErrorKind::Coupon => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::Unavailable | ErrorKind::Conflict | ErrorKind::InvalidTransition => {
                StatusCode::CONFLICT
            }
            ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        let details = match &err {
            BookingError::Coupon(reason) => serde_json::to_value(reason).ok(),
            BookingError::RoomsUnavailable {
                requested,
                available,
            } => Some(serde_json::json!({ "requested": requested, "available": available })),
            _ => None,
        };
        Self {
            error: err.into(),
            details,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            error: AppError::validation(format!("Invalid request: {errors}")),
            details: serde_json::to_value(errors.field_errors()).ok(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = Self::status_for(self.error.kind);
        let body = if status.is_server_error() {
            tracing::error!(
                kind = %self.error.kind,
                error = %self.error,
                "Internal server error"
            );
            ApiErrorBody {
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal error occurred".to_string(),
                details: None,
            }
        } else {
            ApiErrorBody {
                code: self.error.kind.to_string(),
                message: self.error.message,
                details: self.details,
            }
        };

        (
            status,
            Json(serde_json::json!({ "success": false, "error": body })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodging_engine::CouponRejection;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::status_for(ErrorKind::Coupon), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::status_for(ErrorKind::Unavailable), StatusCode::CONFLICT);
        assert_eq!(ApiError::status_for(ErrorKind::InvalidTransition), StatusCode::CONFLICT);
        assert_eq!(ApiError::status_for(ErrorKind::Authorization), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::status_for(ErrorKind::Database),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_coupon_reason_in_details() {
        let err: ApiError = BookingError::Coupon(CouponRejection::UsageLimitReached).into();
        assert_eq!(err.inner().kind, ErrorKind::Coupon);
        let details = err.details.unwrap();
        assert_eq!(details["reason"], "usage_limit_reached");
    }

    #[test]
    fn test_database_error_is_opaque() {
        let err: ApiError = AppError::database("connection refused to 10.0.0.5").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
