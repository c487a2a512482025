/// Health check endpoint
///
/// Reports whether the server can reach its database and whether the schema
/// is current.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "migrations_up_to_date": true,
///   "pool": { "size": 2, "idle": 1, "in_use": 1 }
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;
use synapse_shared::db::{
    migrations::get_migration_status,
    pool::{self, PoolStats},
};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("healthy" or "degraded")
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status ("connected" or "disconnected")
    pub database: String,

    /// Whether every embedded migration has been applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations_up_to_date: Option<bool>,

    /// Connection pool snapshot
    pub pool: PoolStats,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = pool::ping(&state.db).await.is_ok();

    let migrations_up_to_date = if connected {
        get_migration_status(&state.db)
            .await
            .map(|status| status.is_up_to_date)
            .ok()
    } else {
        None
    };

    let healthy = connected && migrations_up_to_date.unwrap_or(false);

    Ok(Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        migrations_up_to_date,
        pool: PoolStats::of(&state.db),
    }))
}
