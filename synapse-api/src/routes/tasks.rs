/// Task endpoints
///
/// # Endpoints
///
/// - `GET /v1/tasks` - List the caller's tasks
/// - `POST /v1/tasks` - Create a task
/// - `GET /v1/tasks/today` - Tasks due today in the caller's zone
/// - `GET /v1/tasks/range` - Tasks due within an inclusive window
/// - `GET /v1/tasks/:id` - Get a task
/// - `PATCH /v1/tasks/:id` - Update any task field
/// - `DELETE /v1/tasks/:id` - Delete a task
/// - `POST /v1/tasks/:id/completion` - Mark complete or incomplete

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::local_now,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use synapse_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskWithProject, UpdateTask},
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Project the task belongs to
    pub project_id: Uuid,

    /// Optional note to link
    pub note_id: Option<Uuid>,

    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    /// Due date
    pub due_at: DateTime<Utc>,

    /// Minutes before `due_at` to remind
    #[validate(range(min = 0, message = "Reminder offset must not be negative"))]
    pub reminder_offset_minutes: Option<i32>,

    /// Recurrence flag
    #[serde(default)]
    pub is_recurring: bool,

    /// Recurrence rule (stored as given)
    #[validate(length(max = 500, message = "Recurrence rule must be at most 500 characters"))]
    pub recurrence_rule: Option<String>,
}

/// Update task request
///
/// Omitted fields are left unchanged; `null` clears nullable fields.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// Move to another project
    pub project_id: Option<Uuid>,

    /// Link or unlink a note
    #[serde(default, deserialize_with = "synapse_shared::models::double_option")]
    pub note_id: Option<Option<Uuid>>,

    /// New title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    /// New description
    #[serde(default, deserialize_with = "synapse_shared::models::double_option")]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<Option<String>>,

    /// New due date
    pub due_at: Option<DateTime<Utc>>,

    /// New reminder offset
    #[serde(default, deserialize_with = "synapse_shared::models::double_option")]
    #[validate(range(min = 0, message = "Reminder offset must not be negative"))]
    pub reminder_offset_minutes: Option<Option<i32>>,

    /// New completion state
    pub is_completed: Option<bool>,

    /// New recurrence flag
    pub is_recurring: Option<bool>,

    /// New recurrence rule
    #[serde(default, deserialize_with = "synapse_shared::models::double_option")]
    #[validate(length(max = 500, message = "Recurrence rule must be at most 500 characters"))]
    pub recurrence_rule: Option<Option<String>>,
}

/// Completion toggle request
#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    /// Desired completion state
    pub is_completed: bool,
}

/// Query for `GET /v1/tasks/today`
#[derive(Debug, Deserialize)]
pub struct TodayQuery {
    /// Caller's UTC offset in minutes east of UTC
    pub tz_offset_minutes: Option<i32>,
}

/// Query for `GET /v1/tasks/range`
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Window start (inclusive)
    pub start: DateTime<Utc>,

    /// Window end (inclusive)
    pub end: DateTime<Utc>,
}

pub(crate) fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> ApiResult<()> {
    if start > end {
        return Err(ApiError::invalid_field("start", "Start must not be after end"));
    }
    Ok(())
}

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

/// List the caller's tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TaskWithProject>>> {
    let tasks = Task::list_by_user(&state.db, &auth.user_id).await?;
    Ok(Json(tasks))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Content-Type: application/json
///
/// {
///   "project_id": "uuid",
///   "title": "Ship report",
///   "due_at": "2024-06-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Project or note belongs to someone else
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.user_id.clone(),
            project_id: req.project_id,
            note_id: req.note_id,
            title: req.title,
            description: req.description,
            due_at: req.due_at,
            reminder_offset_minutes: req.reminder_offset_minutes,
            is_recurring: req.is_recurring,
            recurrence_rule: req.recurrence_rule,
        },
    )
    .await?;

    info!(user_id = %auth.user_id, task_id = %task.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Tasks due today, earliest first
///
/// "Today" is the caller's local day when `tz_offset_minutes` is given,
/// otherwise the server's.
pub async fn list_today(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<TodayQuery>,
) -> ApiResult<Json<Vec<TaskWithProject>>> {
    let now = local_now(query.tz_offset_minutes)?;
    let tasks = Task::list_for_today(&state.db, &auth.user_id, &now).await?;
    Ok(Json(tasks))
}

/// Tasks due between `start` and `end` inclusive, earliest first
pub async fn list_range(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<TaskWithProject>>> {
    check_window(query.start, query.end)?;

    let tasks =
        Task::list_by_date_range(&state.db, &auth.user_id, query.start, query.end).await?;
    Ok(Json(tasks))
}

/// Get a task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskWithProject>> {
    let task = Task::find_by_id_for_user(&state.db, id, &auth.user_id)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(task))
}

/// Update a task
///
/// # Errors
///
/// - `403 Forbidden`: New project or note belongs to someone else
/// - `404 Not Found`: No such task for this user
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::update(
        &state.db,
        id,
        &auth.user_id,
        UpdateTask {
            project_id: req.project_id,
            note_id: req.note_id,
            title: req.title,
            description: req.description,
            due_at: req.due_at,
            reminder_offset_minutes: req.reminder_offset_minutes,
            is_completed: req.is_completed,
            is_recurring: req.is_recurring,
            recurrence_rule: req.recurrence_rule,
        },
    )
    .await?
    .ok_or_else(task_not_found)?;

    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Task::delete(&state.db, id, &auth.user_id).await? {
        return Err(task_not_found());
    }

    info!(user_id = %auth.user_id, task_id = %id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Set a task's completion state
///
/// Idempotent: repeating the same value only refreshes `updated_at`.
pub async fn set_completion(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompletionRequest>,
) -> ApiResult<Json<Task>> {
    let task = Task::toggle_completion(&state.db, id, &auth.user_id, req.is_completed)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(task))
}
