/// Project endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects` - List the caller's projects
/// - `POST /v1/projects` - Create a project
/// - `GET /v1/projects/:id` - Get a project with its task counts
/// - `PATCH /v1/projects/:id` - Update name, color, or archived flag
/// - `DELETE /v1/projects/:id` - Delete a project with its notes and tasks
/// - `GET /v1/projects/:id/notes` - List the project's notes
/// - `GET /v1/projects/:id/tasks` - List the project's tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use synapse_shared::{
    auth::middleware::AuthContext,
    models::{
        note::{Note, NoteWithProject},
        project::{is_valid_hex_color, CreateProject, Project, TaskStats, UpdateProject},
        task::{Task, TaskWithProject},
    },
};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// `#RRGGBB` color; a palette color is picked when omitted
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

/// Update project request
///
/// Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    /// New color
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,

    /// Archive or unarchive
    pub is_archived: Option<bool>,
}

/// Project with its task counts
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    /// The project
    #[serde(flatten)]
    pub project: Project,

    /// Task counts
    pub task_stats: TaskStats,
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    if is_valid_hex_color(color) {
        return Ok(());
    }

    let mut error = ValidationError::new("hex_color");
    error.message = Some("Color must be a hex value like #3B82F6".into());
    Err(error)
}

fn project_not_found() -> ApiError {
    ApiError::NotFound("Project not found".to_string())
}

/// List the caller's projects, oldest first
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list_by_user(&state.db, &auth.user_id).await?;
    Ok(Json(projects))
}

/// Create a project
///
/// # Endpoint
///
/// ```text
/// POST /v1/projects
/// Content-Type: application/json
///
/// { "name": "Work", "color": "#EF4444" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Empty name or malformed color
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = Project::create(
        &state.db,
        CreateProject {
            user_id: auth.user_id.clone(),
            name: req.name,
            color: req.color,
        },
    )
    .await?;

    info!(user_id = %auth.user_id, project_id = %project.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Get a project and its task counts
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectDetail>> {
    let project = Project::find_by_id_for_user(&state.db, id, &auth.user_id)
        .await?
        .ok_or_else(project_not_found)?;

    let task_stats = Project::task_stats(&state.db, id, &auth.user_id)
        .await?
        .ok_or_else(project_not_found)?;

    Ok(Json(ProjectDetail {
        project,
        task_stats,
    }))
}

/// Update a project
///
/// # Errors
///
/// - `404 Not Found`: No such project for this user
/// - `422 Unprocessable Entity`: Invalid name or color
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let update = UpdateProject {
        name: req.name,
        color: req.color,
        is_archived: req.is_archived,
    };

    // Nothing to change; answer with the stored row
    let project = if update.is_empty() {
        Project::find_by_id_for_user(&state.db, id, &auth.user_id).await?
    } else {
        Project::update(&state.db, id, &auth.user_id, update).await?
    }
    .ok_or_else(project_not_found)?;

    Ok(Json(project))
}

/// Delete a project
///
/// Notes and tasks in the project are deleted with it.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Project::delete(&state.db, id, &auth.user_id).await? {
        return Err(project_not_found());
    }

    info!(user_id = %auth.user_id, project_id = %id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List a project's notes, most recently edited first
pub async fn list_project_notes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<NoteWithProject>>> {
    let notes = Note::list_by_project(&state.db, id, &auth.user_id).await?;
    Ok(Json(notes))
}

/// List a project's tasks, newest first
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskWithProject>>> {
    let tasks = Task::list_by_project(&state.db, id, &auth.user_id).await?;
    Ok(Json(tasks))
}
