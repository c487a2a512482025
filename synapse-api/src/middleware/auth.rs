/// Authentication middleware
///
/// Every `/v1` route runs behind [`require_auth`]. It validates the identity
/// provider's bearer token and inserts the resulting
/// [`AuthContext`](synapse_shared::auth::middleware::AuthContext) into the
/// request extensions, where handlers pick it up with
/// `Extension<AuthContext>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use synapse_shared::auth::middleware::authenticate_bearer;

use crate::{app::AppState, error::ApiError};

/// Rejects requests without a valid bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = &state.config.identity;
    let auth_context = authenticate_bearer(req.headers(), &identity.jwt_secret, &identity.issuer)
        .map_err(|err| {
            tracing::debug!(error = %err, path = %req.uri().path(), "Rejected unauthenticated request");
            ApiError::from(err)
        })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
