/// Identity token validation
///
/// Synapse does not issue sessions itself. The identity provider signs a JWT
/// whose `sub` is the opaque user id, and every request carries it as a bearer
/// token. This module validates those tokens against the shared secret.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Validation**: Signature, expiration, not-before, and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use synapse_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "identity-provider-shared-secret-32b";
///
/// let claims = Claims::new("user_2abc", "synapse");
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret, "synapse")?;
/// assert_eq!(validated.sub, "user_2abc");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default token lifetime used by [`Claims::new`]
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },

    /// Token carries an empty subject
    #[error("Token has no subject")]
    MissingSubject,
}

/// JWT claims issued by the identity provider
///
/// # Standard Claims
///
/// - `sub`: Subject (opaque user ID)
/// - `iss`: Issuer
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims valid from now for [`DEFAULT_TOKEN_TTL_HOURS`]
    pub fn new(user_id: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self::with_expiration(user_id, issuer, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    /// Creates claims with a custom lifetime
    ///
    /// # Example
    ///
    /// ```
    /// use synapse_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    ///
    /// let claims = Claims::with_expiration("user_2abc", "synapse", Duration::hours(1));
    /// assert!(!claims.is_expired());
    /// ```
    pub fn with_expiration(
        user_id: impl Into<String>,
        issuer: impl Into<String>,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id.into(),
            iss: issuer.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed JWT from claims
///
/// Production tokens come from the identity provider; this exists for tests
/// and local tooling that need to impersonate it.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Token is not used before nbf time
/// - Issuer matches `issuer`
/// - Subject is non-empty
///
/// # Errors
///
/// Returns `JwtError::Expired`, `JwtError::InvalidIssuer`,
/// `JwtError::MissingSubject`, or `JwtError::ValidationError` for any other
/// failure (bad signature, malformed token).
pub fn validate_token(token: &str, secret: &str, issuer: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: issuer.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(JwtError::MissingSubject);
    }

    Ok(token_data.claims)
}
