/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers should return `Result<T, ApiError>` which automatically
/// converts to appropriate HTTP status codes.
///
/// # Example
///
/// ```
/// use synapse_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler(found: Option<u32>) -> ApiResult<Json<serde_json::Value>> {
///     let value = found.ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
///     Ok(Json(json!({ "value": value })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use synapse_shared::{
    auth::{jwt::JwtError, middleware::AuthError},
    error::AccessError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403) - e.g., target project belongs to someone else
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - constraint violation
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationErrorDetail {
    /// Creates a detail for `field`
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "forbidden")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Shorthand for a single-field validation failure
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail::new(field, message)])
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert access-layer errors to API errors
impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        if err.is_ownership_violation() {
            return ApiError::Forbidden(err.to_string());
        }

        match err {
            AccessError::Database(db_err) => db_err.into(),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

/// Convert auth errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthorized("Missing credentials".to_string()),
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
        }
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        AuthError::from(err).into()
    }
}

/// Convert request validation failures to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest(String::new()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized(String::new()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden(String::new()), StatusCode::FORBIDDEN),
            (ApiError::NotFound(String::new()), StatusCode::NOT_FOUND),
            (ApiError::Conflict(String::new()), StatusCode::CONFLICT),
            (ApiError::ValidationError(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::InternalError(String::new()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_access_error_mapping() {
        let err: ApiError = AccessError::ProjectNotOwned(Uuid::nil()).into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = AccessError::NoteNotOwned(Uuid::nil()).into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = AccessError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = AccessError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }

    #[test]
    fn test_auth_error_mapping() {
        let err: ApiError = AuthError::MissingCredentials.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err: ApiError = AuthError::InvalidFormat("Expected Bearer token".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = JwtError::Expired.into();
        assert!(matches!(err, ApiError::Unauthorized(msg) if msg == "Token expired"));
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name must not be empty"))]
        name: String,
        #[validate(range(min = 0, message = "Must not be negative"))]
        offset: i32,
    }

    #[test]
    fn test_validation_errors_mapping() {
        let sample = Sample {
            name: String::new(),
            offset: -1,
        };
        let err: ApiError = sample.validate().unwrap_err().into();

        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(
                    details,
                    vec![
                        ValidationErrorDetail::new("name", "Name must not be empty"),
                        ValidationErrorDetail::new("offset", "Must not be negative"),
                    ]
                );
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
