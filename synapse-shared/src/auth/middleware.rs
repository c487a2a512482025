/// Request authentication for Axum
///
/// Extracts the identity provider's bearer token from a request, validates it
/// and produces the [`AuthContext`] that handlers receive. The context is the
/// only place a handler learns who the caller is; it is passed explicitly to
/// every access-layer call.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use synapse_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, JwtError};

/// Authenticated identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Opaque user id from the identity provider
    pub user_id: String,
}

impl AuthContext {
    /// Creates an auth context for `user_id`
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            _ => AuthError::InvalidToken(format!("Invalid token: {}", err)),
        }
    }
}

/// Authenticates a request from its `Authorization: Bearer <token>` header
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if the header is absent
/// - `AuthError::InvalidFormat` if it isn't a bearer token
/// - `AuthError::InvalidToken` if validation fails
pub fn authenticate_bearer(
    headers: &HeaderMap,
    secret: &str,
    issuer: &str,
) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token.trim(), secret, issuer)?;

    Ok(AuthContext::new(claims.sub))
}
