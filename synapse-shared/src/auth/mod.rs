/// Identity utilities
///
/// Authentication is delegated to an external identity provider. Synapse
/// trusts the user id carried in the provider's signed token and uses it for
/// all ownership filtering.
///
/// # Modules
///
/// - [`jwt`]: Token validation (HS256, shared secret, issuer check)
/// - [`middleware`]: Bearer-token extraction and the request `AuthContext`
///
/// # Example
///
/// ```
/// use synapse_shared::auth::jwt::{create_token, Claims};
/// use synapse_shared::auth::middleware::authenticate_bearer;
/// use axum::http::{header, HeaderMap};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "identity-provider-shared-secret-32b";
/// let token = create_token(&Claims::new("user_2abc", "synapse"), secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, format!("Bearer {}", token).parse()?);
///
/// let auth = authenticate_bearer(&headers, secret, "synapse")?;
/// assert_eq!(auth.user_id, "user_2abc");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
