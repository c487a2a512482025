/// Task model and database operations
///
/// Tasks carry their own `user_id`, so updates and deletes are scoped by
/// `(id, user_id)` directly. The project a task is filed under (and the note
/// it optionally links to) must belong to the same user; that is verified on
/// creation and whenever an update changes either reference.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     note_id UUID REFERENCES notes(id) ON DELETE SET NULL,
///     title TEXT NOT NULL,
///     description TEXT,
///     due_at TIMESTAMPTZ NOT NULL,
///     reminder_offset_minutes INTEGER,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
///     recurrence_rule TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use synapse_shared::models::task::{Task, CreateTask};
/// use chrono::{TimeZone, Utc};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let due = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
///
/// let task = Task::create(&pool, CreateTask {
///     description: Some("Q2 numbers".to_string()),
///     ..CreateTask::new("user_2abc", project_id, "Ship report", due)
/// }).await?;
///
/// let june_first = Task::list_by_date_range(&pool, "user_2abc", due, due).await?;
/// assert_eq!(june_first[0].task.id, task.id);
///
/// Task::toggle_completion(&pool, task.id, "user_2abc", true).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{note::Note, project::Project};
use crate::calendar::day_bounds;
use crate::error::{AccessError, AccessResult};

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: String,

    /// Project the task is filed under (same owner)
    pub project_id: Uuid,

    /// Optional linked note; cleared if the note is deleted
    pub note_id: Option<Uuid>,

    /// Task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// When the task is due
    pub due_at: DateTime<Utc>,

    /// Minutes before `due_at` to remind the user (stored, not scheduled)
    pub reminder_offset_minutes: Option<i32>,

    /// Whether the task is done
    pub is_completed: bool,

    /// Recurrence flag; no instances are generated from it
    pub is_recurring: bool,

    /// Free-form recurrence rule (e.g. an RRULE string)
    pub recurrence_rule: Option<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task joined with the display fields of its project and note
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithProject {
    /// The task itself
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,

    /// Project name
    pub project_name: String,

    /// Project color
    pub project_color: String,

    /// Linked note's title, when a note is linked and titled
    pub note_title: Option<String>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user
    pub user_id: String,

    /// Project; must belong to `user_id`
    pub project_id: Uuid,

    /// Optional note; its project must belong to `user_id`
    pub note_id: Option<Uuid>,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Due date
    pub due_at: DateTime<Utc>,

    /// Reminder offset in minutes
    pub reminder_offset_minutes: Option<i32>,

    /// Recurrence flag (defaults to false)
    #[serde(default)]
    pub is_recurring: bool,

    /// Recurrence rule
    pub recurrence_rule: Option<String>,
}

impl CreateTask {
    /// Creates input with the required fields set and everything else empty
    pub fn new(
        user_id: impl Into<String>,
        project_id: Uuid,
        title: impl Into<String>,
        due_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            project_id,
            note_id: None,
            title: title.into(),
            description: None,
            due_at,
            reminder_offset_minutes: None,
            is_recurring: false,
            recurrence_rule: None,
        }
    }
}

/// Input for updating an existing task
///
/// Only non-None fields will be updated. Nullable columns take
/// `Some(None)` to clear them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// Move to another project owned by the same user
    pub project_id: Option<Uuid>,

    /// Link to another note (use Some(None) to unlink)
    pub note_id: Option<Option<Uuid>>,

    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New due date
    pub due_at: Option<DateTime<Utc>>,

    /// New reminder offset (use Some(None) to clear)
    pub reminder_offset_minutes: Option<Option<i32>>,

    /// New completion state
    pub is_completed: Option<bool>,

    /// New recurrence flag
    pub is_recurring: Option<bool>,

    /// New recurrence rule (use Some(None) to clear)
    pub recurrence_rule: Option<Option<String>>,
}

const TASK_COLUMNS: &str = "id, user_id, project_id, note_id, title, description, due_at, \
     reminder_offset_minutes, is_completed, is_recurring, recurrence_rule, created_at, updated_at";

const TASK_WITH_PROJECT_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.project_id, t.note_id, t.title, t.description, t.due_at,
           t.reminder_offset_minutes, t.is_completed, t.is_recurring, t.recurrence_rule,
           t.created_at, t.updated_at,
           p.name AS project_name, p.color AS project_color,
           n.title AS note_title
    FROM tasks t
    JOIN projects p ON p.id = t.project_id AND p.user_id = t.user_id
    LEFT JOIN notes n ON n.id = t.note_id
"#;

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// - `AccessError::ProjectNotOwned` if the project doesn't belong to
    ///   `data.user_id`
    /// - `AccessError::NoteNotOwned` if a note is given and doesn't belong
    ///   to `data.user_id`
    /// - `AccessError::Database` on storage failure
    pub async fn create(pool: &PgPool, data: CreateTask) -> AccessResult<Self> {
        let mut tx = pool.begin().await?;

        if !Project::is_owned_by(&mut *tx, data.project_id, &data.user_id).await? {
            warn!(
                user_id = %data.user_id,
                project_id = %data.project_id,
                "Rejected task creation in unowned project"
            );
            return Err(AccessError::ProjectNotOwned(data.project_id));
        }

        if let Some(note_id) = data.note_id {
            if !Note::is_owned_by(&mut *tx, note_id, &data.user_id).await? {
                warn!(
                    user_id = %data.user_id,
                    note_id = %note_id,
                    "Rejected task creation linked to unowned note"
                );
                return Err(AccessError::NoteNotOwned(note_id));
            }
        }

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, project_id, note_id, title, description, due_at,
                               reminder_offset_minutes, is_recurring, recurrence_rule)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&data.user_id)
        .bind(data.project_id)
        .bind(data.note_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_at)
        .bind(data.reminder_offset_minutes)
        .bind(data.is_recurring)
        .bind(data.recurrence_rule)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(task_id = %task.id, project_id = %task.project_id, "Created task");
        Ok(task)
    }

    /// Lists all tasks of a user, newest first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<TaskWithProject>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithProject>(&format!(
            "{TASK_WITH_PROJECT_SELECT} WHERE t.user_id = $1 ORDER BY t.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks of one project, newest first
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        user_id: &str,
    ) -> Result<Vec<TaskWithProject>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithProject>(&format!(
            "{TASK_WITH_PROJECT_SELECT} WHERE t.project_id = $1 AND t.user_id = $2 \
             ORDER BY t.created_at DESC"
        ))
        .bind(project_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks linked to one note, newest first
    pub async fn list_by_note(
        pool: &PgPool,
        note_id: Uuid,
        user_id: &str,
    ) -> Result<Vec<TaskWithProject>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithProject>(&format!(
            "{TASK_WITH_PROJECT_SELECT} WHERE t.note_id = $1 AND t.user_id = $2 \
             ORDER BY t.created_at DESC"
        ))
        .bind(note_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by ID, scoped to its owner
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<TaskWithProject>, sqlx::Error> {
        let task = sqlx::query_as::<_, TaskWithProject>(&format!(
            "{TASK_WITH_PROJECT_SELECT} WHERE t.id = $1 AND t.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks due on the local calendar day containing `now`
    ///
    /// The window is `[local midnight, next local midnight)` in `now`'s time
    /// zone. Results are ordered by `due_at` ascending.
    pub async fn list_for_today<Tz: TimeZone>(
        pool: &PgPool,
        user_id: &str,
        now: &DateTime<Tz>,
    ) -> Result<Vec<TaskWithProject>, sqlx::Error> {
        let (start, end) = day_bounds(now);

        debug!(user_id = %user_id, %start, %end, "Listing tasks for today");

        let tasks = sqlx::query_as::<_, TaskWithProject>(&format!(
            "{TASK_WITH_PROJECT_SELECT} WHERE t.user_id = $1 AND t.due_at >= $2 AND t.due_at < $3 \
             ORDER BY t.due_at ASC"
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks with `due_at` in `[start, end]` (both inclusive)
    ///
    /// Results are ordered by `due_at` ascending. `start > end` yields an
    /// empty list.
    pub async fn list_by_date_range(
        pool: &PgPool,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TaskWithProject>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithProject>(&format!(
            "{TASK_WITH_PROJECT_SELECT} WHERE t.user_id = $1 AND t.due_at >= $2 AND t.due_at <= $3 \
             ORDER BY t.due_at ASC"
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates a task, scoped by `(id, user_id)`
    ///
    /// # Returns
    ///
    /// The updated task, or None if it doesn't exist or belongs to another
    /// user (nothing is modified in that case)
    ///
    /// # Errors
    ///
    /// `AccessError::ProjectNotOwned` / `AccessError::NoteNotOwned` if the
    /// update re-files the task under a project or note the user doesn't own
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
        data: UpdateTask,
    ) -> AccessResult<Option<Self>> {
        let mut tx = pool.begin().await?;

        if let Some(project_id) = data.project_id {
            if !Project::is_owned_by(&mut *tx, project_id, user_id).await? {
                warn!(
                    user_id = %user_id,
                    task_id = %id,
                    project_id = %project_id,
                    "Rejected task move into unowned project"
                );
                return Err(AccessError::ProjectNotOwned(project_id));
            }
        }

        if let Some(Some(note_id)) = data.note_id {
            if !Note::is_owned_by(&mut *tx, note_id, user_id).await? {
                warn!(
                    user_id = %user_id,
                    task_id = %id,
                    note_id = %note_id,
                    "Rejected task link to unowned note"
                );
                return Err(AccessError::NoteNotOwned(note_id));
            }
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE tasks SET updated_at = NOW()");

        if let Some(project_id) = data.project_id {
            query.push(", project_id = ").push_bind(project_id);
        }
        if let Some(note_id) = data.note_id {
            query.push(", note_id = ").push_bind(note_id);
        }
        if let Some(title) = data.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(due_at) = data.due_at {
            query.push(", due_at = ").push_bind(due_at);
        }
        if let Some(offset) = data.reminder_offset_minutes {
            query.push(", reminder_offset_minutes = ").push_bind(offset);
        }
        if let Some(is_completed) = data.is_completed {
            query.push(", is_completed = ").push_bind(is_completed);
        }
        if let Some(is_recurring) = data.is_recurring {
            query.push(", is_recurring = ").push_bind(is_recurring);
        }
        if let Some(rule) = data.recurrence_rule {
            query.push(", recurrence_rule = ").push_bind(rule);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(user_id)
            .push(" RETURNING ")
            .push(TASK_COLUMNS);

        let task = query
            .build_query_as::<Task>()
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        if task.is_none() {
            debug!(task_id = %id, user_id = %user_id, "Task update matched no rows");
        }

        Ok(task)
    }

    /// Sets a task's completion state, scoped by `(id, user_id)`
    ///
    /// Takes the target state rather than flipping it, so repeating the call
    /// is idempotent. `updated_at` is refreshed on every call.
    pub async fn toggle_completion(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
        is_completed: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET is_completed = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(is_completed)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Moves a task to a new due date, scoped by `(id, user_id)`
    ///
    /// Backs calendar drag-and-drop; a `None` result tells the client to
    /// revert the drop.
    pub async fn reschedule(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
        due_at: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET due_at = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(due_at)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task, scoped by `(id, user_id)`
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist or belongs to
    /// another user
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
