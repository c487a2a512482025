/// Note model and database operations
///
/// Notes carry no user column: a note belongs to a project, and the project
/// belongs to a user. Every read, update and delete therefore joins through
/// `projects` and filters on `projects.user_id`. Creation and project moves
/// verify the target project's owner first.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title TEXT,
///     content JSONB,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use synapse_shared::models::note::{Note, CreateNote};
/// use sqlx::PgPool;
/// use serde_json::json;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let note = Note::create(&pool, "user_2abc", CreateNote {
///     project_id,
///     title: Some("Meeting notes".to_string()),
///     content: Some(json!({"type": "doc", "content": []})),
/// }).await?;
///
/// let notes = Note::list_by_project(&pool, project_id, "user_2abc").await?;
/// assert!(notes.iter().any(|n| n.note.id == note.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::{debug, warn};
use uuid::Uuid;

use super::project::Project;
use crate::error::{AccessError, AccessResult};

/// Note model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    /// Unique note ID (UUID v4)
    pub id: Uuid,

    /// Parent project (the note's owner is the project's owner)
    pub project_id: Uuid,

    /// Optional title
    pub title: Option<String>,

    /// Rich-text document tree, stored verbatim
    ///
    /// Example: {"type": "doc", "content": [{"type": "paragraph", "content": [...]}]}
    pub content: Option<JsonValue>,

    /// When the note was created
    pub created_at: DateTime<Utc>,

    /// When the note was last updated
    pub updated_at: DateTime<Utc>,
}

/// Note joined with the display fields of its project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NoteWithProject {
    /// The note itself
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub note: Note,

    /// Parent project name
    pub project_name: String,

    /// Parent project color
    pub project_color: String,
}

/// Input for creating a new note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    /// Parent project; must belong to the acting user
    pub project_id: Uuid,

    /// Optional title
    pub title: Option<String>,

    /// Optional document tree
    pub content: Option<JsonValue>,
}

/// Input for updating an existing note
///
/// Only non-None fields will be updated. Nullable columns take
/// `Some(None)` to clear them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNote {
    /// Move the note to another project owned by the same user
    pub project_id: Option<Uuid>,

    /// New title (use Some(None) to clear)
    pub title: Option<Option<String>>,

    /// New document tree (use Some(None) to clear)
    pub content: Option<Option<JsonValue>>,
}

impl UpdateNote {
    /// Whether the update would change nothing but `updated_at`
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none() && self.title.is_none() && self.content.is_none()
    }
}

/// Checks that a value has the shape of an editor document: a JSON object
/// with a string `type` and, if present, an array `content`
pub fn is_valid_document(value: &JsonValue) -> bool {
    let Some(node) = value.as_object() else {
        return false;
    };

    let has_type = node.get("type").map_or(false, JsonValue::is_string);
    let content_ok = node.get("content").map_or(true, JsonValue::is_array);

    has_type && content_ok
}

const NOTE_COLUMNS: &str = "id, project_id, title, content, created_at, updated_at";

const NOTE_WITH_PROJECT_SELECT: &str = r#"
    SELECT n.id, n.project_id, n.title, n.content, n.created_at, n.updated_at,
           p.name AS project_name, p.color AS project_color
    FROM notes n
    JOIN projects p ON p.id = n.project_id
"#;

impl Note {
    /// Creates a new note in a project owned by `user_id`
    ///
    /// # Errors
    ///
    /// - `AccessError::ProjectNotOwned` if the project doesn't exist or
    ///   belongs to another user (nothing is inserted)
    /// - `AccessError::Database` on storage failure
    pub async fn create(pool: &PgPool, user_id: &str, data: CreateNote) -> AccessResult<Self> {
        let mut tx = pool.begin().await?;

        if !Project::is_owned_by(&mut *tx, data.project_id, user_id).await? {
            warn!(
                user_id = %user_id,
                project_id = %data.project_id,
                "Rejected note creation in unowned project"
            );
            return Err(AccessError::ProjectNotOwned(data.project_id));
        }

        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            INSERT INTO notes (project_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(note_id = %note.id, project_id = %note.project_id, "Created note");
        Ok(note)
    }

    /// Lists every note in every project owned by `user_id`
    ///
    /// Most recently updated first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<NoteWithProject>, sqlx::Error> {
        let notes = sqlx::query_as::<_, NoteWithProject>(&format!(
            "{NOTE_WITH_PROJECT_SELECT} WHERE p.user_id = $1 ORDER BY n.updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notes)
    }

    /// Lists the notes of one project, scoped to the project's owner
    ///
    /// Returns an empty list if the project belongs to another user.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        user_id: &str,
    ) -> Result<Vec<NoteWithProject>, sqlx::Error> {
        let notes = sqlx::query_as::<_, NoteWithProject>(&format!(
            "{NOTE_WITH_PROJECT_SELECT} WHERE n.project_id = $1 AND p.user_id = $2 \
             ORDER BY n.updated_at DESC"
        ))
        .bind(project_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notes)
    }

    /// Finds a note by ID, scoped through its project's owner
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<NoteWithProject>, sqlx::Error> {
        let note = sqlx::query_as::<_, NoteWithProject>(&format!(
            "{NOTE_WITH_PROJECT_SELECT} WHERE n.id = $1 AND p.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(note)
    }

    /// Checks whether a note exists and its project belongs to `user_id`
    pub async fn is_owned_by<'e, E>(executor: E, id: Uuid, user_id: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let owned: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM notes n
                JOIN projects p ON p.id = n.project_id
                WHERE n.id = $1 AND p.user_id = $2
            )
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(owned)
    }

    /// Updates a note, scoped through its current project's owner
    ///
    /// # Returns
    ///
    /// The updated note, or None if it doesn't exist or belongs to another
    /// user (nothing is modified in that case)
    ///
    /// # Errors
    ///
    /// `AccessError::ProjectNotOwned` if `data.project_id` names a project
    /// the user doesn't own
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
        data: UpdateNote,
    ) -> AccessResult<Option<Self>> {
        let mut tx = pool.begin().await?;

        if let Some(project_id) = data.project_id {
            if !Project::is_owned_by(&mut *tx, project_id, user_id).await? {
                warn!(
                    user_id = %user_id,
                    note_id = %id,
                    project_id = %project_id,
                    "Rejected note move into unowned project"
                );
                return Err(AccessError::ProjectNotOwned(project_id));
            }
        }

        // The join sees the pre-update project_id, so the note's current
        // project must be owned as well.
        let mut query = QueryBuilder::<Postgres>::new("UPDATE notes n SET updated_at = NOW()");

        if let Some(project_id) = data.project_id {
            query.push(", project_id = ").push_bind(project_id);
        }
        if let Some(title) = data.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(content) = data.content {
            query.push(", content = ").push_bind(content);
        }

        query
            .push(" FROM projects p WHERE n.project_id = p.id AND n.id = ")
            .push_bind(id)
            .push(" AND p.user_id = ")
            .push_bind(user_id)
            .push(
                " RETURNING n.id, n.project_id, n.title, n.content, n.created_at, n.updated_at",
            );

        let note = query
            .build_query_as::<Note>()
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        if note.is_none() {
            debug!(note_id = %id, user_id = %user_id, "Note update matched no rows");
        }

        Ok(note)
    }

    /// Deletes a note, scoped through its project's owner
    ///
    /// Tasks linked to the note keep existing with `note_id` cleared.
    ///
    /// # Returns
    ///
    /// True if the note was deleted, false if it didn't exist or belongs to
    /// another user
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM notes n
            USING projects p
            WHERE n.project_id = p.id AND n.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
