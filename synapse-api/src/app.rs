/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use synapse_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = synapse_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth::require_auth, security::SecurityHeadersLayer},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /v1/                             # Bearer token required
///     ├── /users/me                    GET
///     ├── /users/me/provision          POST
///     ├── /dashboard                   GET
///     ├── /projects                    GET, POST
///     ├── /projects/:id                GET, PATCH, DELETE
///     ├── /projects/:id/notes          GET
///     ├── /projects/:id/tasks          GET
///     ├── /notes                       GET, POST
///     ├── /notes/:id                   GET, PATCH, DELETE
///     ├── /notes/:id/tasks             GET
///     ├── /tasks                       GET, POST
///     ├── /tasks/today                 GET
///     ├── /tasks/range                 GET
///     ├── /tasks/:id                   GET, PATCH, DELETE
///     ├── /tasks/:id/completion        POST
///     ├── /calendar/events             GET
///     └── /calendar/events/:id         PATCH
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Response compression (gzip, brotli)
/// 4. Logging (tower-http TraceLayer)
/// 5. Authentication (`/v1` only)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route("/me", get(routes::users::me))
        .route("/me/provision", post(routes::users::provision));

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/:id/notes", get(routes::projects::list_project_notes))
        .route("/:id/tasks", get(routes::projects::list_project_tasks));

    let note_routes = Router::new()
        .route(
            "/",
            get(routes::notes::list_notes).post(routes::notes::create_note),
        )
        .route(
            "/:id",
            get(routes::notes::get_note)
                .patch(routes::notes::update_note)
                .delete(routes::notes::delete_note),
        )
        .route("/:id/tasks", get(routes::notes::list_note_tasks));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/today", get(routes::tasks::list_today))
        .route("/range", get(routes::tasks::list_range))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:id/completion", post(routes::tasks::set_completion));

    let calendar_routes = Router::new()
        .route("/events", get(routes::calendar::list_events))
        .route("/events/:id", patch(routes::calendar::reschedule_event));

    let v1_routes = Router::new()
        .nest("/users", user_routes)
        .route("/dashboard", get(routes::dashboard::dashboard))
        .nest("/projects", project_routes)
        .nest("/notes", note_routes)
        .nest("/tasks", task_routes)
        .nest("/calendar", calendar_routes)
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Builds the CORS layer for the configured origins
///
/// `*` allows any origin without credentials; an explicit list allows
/// credentials for exactly those origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
