// Error handling module for the vehicle marketplace API
// Provides centralized error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::recommendations::{InvalidFilterValue, ServiceError};

/// Main error type for the API
/// All handlers return Result<T, ApiError>
///
/// Each variant maps to a specific HTTP status code and error response format.
#[derive(Debug)]
pub enum ApiError {
    /// Request DTO failed its `validator` rules
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// Unknown filter tag or inverted range; the message is shown verbatim
    /// Maps to HTTP 400 Bad Request
    InvalidFilterValue(String),

    /// Malformed query parameters (paging, sorting)
    /// Maps to HTTP 400 Bad Request
    BadRequest(String),

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    NotFound { resource: String, id: String },

    /// Database operation errors
    /// Maps to HTTP 500; details stay in the logs
    DatabaseError(sqlx::Error),
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "INVALID_FILTER_VALUE", "NOT_FOUND")
    #[schema(example = "INVALID_FILTER_VALUE")]
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation errors, when there are any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: String, details: Option<serde_json::Value>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message,
            details,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Converts the error into a status code and client-safe body
    ///
    /// Client errors are logged at debug, 5xx at error with the full cause.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let response = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorResponse::new(
                    "VALIDATION_ERROR",
                    "Request validation failed".to_string(),
                    Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
                )
            }
            ApiError::InvalidFilterValue(message) => {
                debug!("Invalid filter value: {}", message);
                ErrorResponse::new("INVALID_FILTER_VALUE", message.clone(), None)
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                ErrorResponse::new("BAD_REQUEST", message.clone(), None)
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                ErrorResponse::new(
                    "NOT_FOUND",
                    format!("{} with id {} not found", resource, id),
                    None,
                )
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                ErrorResponse::new(
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
        };
        (status, response)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidFilterValue(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

impl From<InvalidFilterValue> for ApiError {
    fn from(error: InvalidFilterValue) -> Self {
        ApiError::InvalidFilterValue(error.message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::InvalidFilter(invalid) => invalid.into(),
            ServiceError::Database(db_error) => ApiError::DatabaseError(db_error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidFilterValue("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound {
                resource: "Vehicle".to_string(),
                id: "1".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_filter_message_is_verbatim() {
        let (status, body) = ApiError::from(InvalidFilterValue::new("Invalid fuel type(s): 'Rocket'"))
            .to_error_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_code, "INVALID_FILTER_VALUE");
        assert_eq!(body.message, "Invalid fuel type(s): 'Rocket'");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_database_error_hides_details() {
        let (status, body) = ApiError::from(sqlx::Error::PoolTimedOut).to_error_response();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error_code, "DATABASE_ERROR");
        assert_eq!(body.message, "A database error occurred");
    }

    #[test]
    fn test_service_error_conversion() {
        let error: ApiError = ServiceError::InvalidFilter(InvalidFilterValue::new("bad")).into();
        assert!(matches!(error, ApiError::InvalidFilterValue(ref m) if m == "bad"));

        let error: ApiError = ServiceError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(error, ApiError::DatabaseError(_)));
    }
}
