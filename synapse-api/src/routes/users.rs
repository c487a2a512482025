/// User endpoints
///
/// # Endpoints
///
/// - `POST /v1/users/me/provision` - Record the caller and create their default project
/// - `GET /v1/users/me` - Fetch the caller's user row

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use synapse_shared::{
    auth::middleware::AuthContext,
    models::user::User,
    provisioning::{provision_user, Provisioned},
};

/// Provision the authenticated user
///
/// Safe to call on every sign-in. Answers `201 Created` the first time and
/// `200 OK` afterwards.
///
/// # Response
///
/// ```json
/// {
///   "user": { "id": "user_2abc", "created_at": "2024-06-01T09:00:00Z" },
///   "default_project": { "id": "uuid", "name": "Personal", "color": "#3B82F6", ... },
///   "created": true
/// }
/// ```
pub async fn provision(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<(StatusCode, Json<Provisioned>)> {
    let provisioned = provision_user(&state.db, &auth.user_id).await?;

    let status = if provisioned.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(provisioned)))
}

/// Get the authenticated user
///
/// # Errors
///
/// - `404 Not Found`: The user has not been provisioned yet
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not provisioned".to_string()))?;

    Ok(Json(user))
}
