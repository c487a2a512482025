/// Note endpoints
///
/// # Endpoints
///
/// - `GET /v1/notes` - List the caller's notes across projects
/// - `POST /v1/notes` - Create a note in one of the caller's projects
/// - `GET /v1/notes/:id` - Get a note
/// - `PATCH /v1/notes/:id` - Update title, content, or move to another project
/// - `DELETE /v1/notes/:id` - Delete a note (linked tasks are kept, unlinked)
/// - `GET /v1/notes/:id/tasks` - List tasks linked to a note

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use synapse_shared::{
    auth::middleware::AuthContext,
    models::{
        note::{is_valid_document, CreateNote, Note, NoteWithProject, UpdateNote},
        task::{Task, TaskWithProject},
    },
};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Create note request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// Parent project
    pub project_id: Uuid,

    /// Optional title
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    /// Optional editor document
    #[validate(custom(function = "validate_document"))]
    pub content: Option<JsonValue>,
}

/// Update note request
///
/// Omitted fields are left unchanged; `null` clears `title` or `content`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNoteRequest {
    /// Move to another project
    pub project_id: Option<Uuid>,

    /// New title
    #[serde(default, deserialize_with = "synapse_shared::models::double_option")]
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<Option<String>>,

    /// New document
    #[serde(default, deserialize_with = "synapse_shared::models::double_option")]
    #[validate(custom(function = "validate_document"))]
    pub content: Option<Option<JsonValue>>,
}

fn validate_document(content: &JsonValue) -> Result<(), ValidationError> {
    if is_valid_document(content) {
        return Ok(());
    }

    let mut error = ValidationError::new("document");
    error.message = Some("Content must be an editor document object with a \"type\"".into());
    Err(error)
}

fn note_not_found() -> ApiError {
    ApiError::NotFound("Note not found".to_string())
}

/// List the caller's notes, most recently edited first
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<NoteWithProject>>> {
    let notes = Note::list_by_user(&state.db, &auth.user_id).await?;
    Ok(Json(notes))
}

/// Create a note
///
/// # Endpoint
///
/// ```text
/// POST /v1/notes
/// Content-Type: application/json
///
/// {
///   "project_id": "uuid",
///   "title": "Meeting",
///   "content": { "type": "doc", "content": [] }
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: The project belongs to someone else or doesn't exist
/// - `422 Unprocessable Entity`: Title too long or content malformed
pub async fn create_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    req.validate()?;

    let note = Note::create(
        &state.db,
        &auth.user_id,
        CreateNote {
            project_id: req.project_id,
            title: req.title,
            content: req.content,
        },
    )
    .await?;

    info!(user_id = %auth.user_id, note_id = %note.id, "Note created");

    Ok((StatusCode::CREATED, Json(note)))
}

/// Get a note
pub async fn get_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<NoteWithProject>> {
    let note = Note::find_by_id_for_user(&state.db, id, &auth.user_id)
        .await?
        .ok_or_else(note_not_found)?;

    Ok(Json(note))
}

/// Update a note
///
/// An empty body changes nothing and returns the stored note.
///
/// # Errors
///
/// - `403 Forbidden`: Moving into a project the caller doesn't own
/// - `404 Not Found`: No such note for this user
pub async fn update_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    req.validate()?;

    let update = UpdateNote {
        project_id: req.project_id,
        title: req.title,
        content: req.content,
    };

    let note = if update.is_empty() {
        Note::find_by_id_for_user(&state.db, id, &auth.user_id)
            .await?
            .map(|found| found.note)
    } else {
        Note::update(&state.db, id, &auth.user_id, update).await?
    }
    .ok_or_else(note_not_found)?;

    Ok(Json(note))
}

/// Delete a note
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Note::delete(&state.db, id, &auth.user_id).await? {
        return Err(note_not_found());
    }

    info!(user_id = %auth.user_id, note_id = %id, "Note deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List tasks linked to a note, newest first
pub async fn list_note_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskWithProject>>> {
    let tasks = Task::list_by_note(&state.db, id, &auth.user_id).await?;
    Ok(Json(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let req: UpdateNoteRequest =
            serde_json::from_value(json!({ "title": null })).unwrap();
        assert_eq!(req.title, Some(None));
        assert_eq!(req.content, None);
        assert_eq!(req.project_id, None);

        let req: UpdateNoteRequest =
            serde_json::from_value(json!({ "content": { "type": "doc" } })).unwrap();
        assert_eq!(req.content, Some(Some(json!({ "type": "doc" }))));
    }

    fn fields(err: validator::ValidationErrors) -> Vec<String> {
        match ApiError::from(err) {
            ApiError::ValidationError(details) => details.into_iter().map(|d| d.field).collect(),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_request_content_must_be_document() {
        let req: CreateNoteRequest = serde_json::from_value(json!({
            "project_id": Uuid::nil(),
            "content": { "type": "doc", "content": [] }
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let req: CreateNoteRequest = serde_json::from_value(json!({
            "project_id": Uuid::nil(),
            "title": "x".repeat(201),
            "content": "plain text"
        }))
        .unwrap();
        assert_eq!(fields(req.validate().unwrap_err()), vec!["content", "title"]);
    }

    #[test]
    fn test_update_request_validation() {
        let req: UpdateNoteRequest =
            serde_json::from_value(json!({ "title": null, "content": null })).unwrap();
        assert!(req.validate().is_ok());

        let req: UpdateNoteRequest = serde_json::from_value(json!({ "title": "Meeting" })).unwrap();
        assert!(req.validate().is_ok());

        let req: UpdateNoteRequest = serde_json::from_value(json!({
            "title": "x".repeat(201),
            "content": { "content": [] }
        }))
        .unwrap();
        assert_eq!(fields(req.validate().unwrap_err()), vec!["content", "title"]);
    }
}
