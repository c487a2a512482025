/// Project model and database operations
///
/// Projects are the user-owned containers for notes and tasks. Every other
/// entity resolves its owner through a project, so `(id, user_id)` scoping on
/// this table is the root of all ownership checks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name TEXT NOT NULL,
///     color TEXT NOT NULL DEFAULT '#3B82F6',
///     is_archived BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use synapse_shared::models::project::{Project, CreateProject, UpdateProject};
/// use synapse_shared::db::pool::{connect, PoolSize};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = connect("postgresql://localhost/synapse", PoolSize::default()).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     user_id: "user_2abc".to_string(),
///     name: "Work".to_string(),
///     color: Some("#EF4444".to_string()),
/// }).await?;
///
/// // Archive it; a different user_id would leave it untouched and return None
/// let archived = Project::update(&pool, project.id, "user_2abc", UpdateProject {
///     is_archived: Some(true),
///     ..Default::default()
/// }).await?;
/// assert!(archived.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

/// Color assigned to the default "Personal" project
pub const DEFAULT_PROJECT_COLOR: &str = "#3B82F6";

/// Colors a new project is randomly assigned when none is given
pub const PROJECT_PALETTE: [&str; 8] = [
    "#3B82F6", // blue
    "#EF4444", // red
    "#10B981", // green
    "#F59E0B", // yellow
    "#8B5CF6", // violet
    "#EC4899", // pink
    "#06B6D4", // cyan
    "#F97316", // orange
];

/// Picks a random color from [`PROJECT_PALETTE`]
pub fn random_color() -> &'static str {
    PROJECT_PALETTE
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(DEFAULT_PROJECT_COLOR)
}

/// Checks that `color` is a `#RRGGBB` hex string
pub fn is_valid_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Project model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Display color (`#RRGGBB`)
    pub color: String,

    /// Archived projects stay queryable; the flag is a display hint
    pub is_archived: bool,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Owning user
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Display color; a random palette color is used when `None`
    pub color: Option<String>,
}

/// Input for updating an existing project
///
/// Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New color
    pub color: Option<String>,

    /// Archive or unarchive
    pub is_archived: Option<bool>,
}

impl UpdateProject {
    /// Whether the update would change nothing but `updated_at`
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.is_archived.is_none()
    }
}

/// Task counts for a single project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskStats {
    /// All tasks in the project
    pub total: i64,

    /// Tasks marked completed
    pub completed: i64,

    /// Tasks not yet completed
    pub pending: i64,
}

const PROJECT_COLUMNS: &str = "id, user_id, name, color, is_archived, created_at, updated_at";

impl Project {
    /// Creates a new project
    ///
    /// # Errors
    ///
    /// Returns an error if the user row doesn't exist (foreign key violation),
    /// the color is malformed (check constraint), or the database fails.
    pub async fn create<'e, E>(executor: E, data: CreateProject) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let color = data.color.unwrap_or_else(|| random_color().to_string());

        debug!(user_id = %data.user_id, name = %data.name, color = %color, "Creating project");

        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (user_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.name)
        .bind(color)
        .fetch_one(executor)
        .await?;

        Ok(project)
    }

    /// Lists all projects owned by a user
    ///
    /// Rows come back in creation order for stable output; callers should
    /// not depend on any ordering.
    pub async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Finds a project by ID, scoped to its owner
    ///
    /// # Returns
    ///
    /// The project if it exists and belongs to `user_id`, None otherwise
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Checks whether a project exists and belongs to `user_id`
    ///
    /// This is the precondition for attaching notes and tasks to a project.
    pub async fn is_owned_by<'e, E>(executor: E, id: Uuid, user_id: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(owned)
    }

    /// Updates a project, scoped by `(id, user_id)`
    ///
    /// Only non-None fields in `data` are changed; `updated_at` is always
    /// refreshed.
    ///
    /// # Returns
    ///
    /// The updated project, or None if it doesn't exist or belongs to
    /// another user (nothing is modified in that case)
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE projects SET updated_at = NOW()");

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(color) = data.color {
            query.push(", color = ").push_bind(color);
        }
        if let Some(is_archived) = data.is_archived {
            query.push(", is_archived = ").push_bind(is_archived);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(user_id)
            .push(format!(" RETURNING {PROJECT_COLUMNS}"));

        let project = query
            .build_query_as::<Project>()
            .fetch_optional(pool)
            .await?;

        if project.is_none() {
            debug!(project_id = %id, user_id = %user_id, "Project update matched no rows");
        }

        Ok(project)
    }

    /// Deletes a project, scoped by `(id, user_id)`
    ///
    /// ⚠️  Cascades to every note and task in the project.
    ///
    /// # Returns
    ///
    /// True if the project was deleted, false if it didn't exist or belongs
    /// to another user
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total, completed and pending tasks in a project
    ///
    /// # Returns
    ///
    /// None if the project doesn't exist or belongs to another user
    pub async fn task_stats(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<TaskStats>, sqlx::Error> {
        let stats = sqlx::query_as::<_, TaskStats>(
            r#"
            SELECT COUNT(t.id) AS total,
                   COUNT(t.id) FILTER (WHERE t.is_completed) AS completed,
                   COUNT(t.id) FILTER (WHERE NOT t.is_completed) AS pending
            FROM projects p
            LEFT JOIN tasks t ON t.project_id = p.id
            WHERE p.id = $1 AND p.user_id = $2
            GROUP BY p.id
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_color_is_from_palette() {
        for _ in 0..32 {
            assert!(PROJECT_PALETTE.contains(&random_color()));
        }
    }

    #[test]
    fn test_palette_colors_are_valid() {
        assert!(PROJECT_PALETTE.iter().all(|c| is_valid_hex_color(c)));
        assert!(is_valid_hex_color(DEFAULT_PROJECT_COLOR));
    }

    #[test]
    fn test_is_valid_hex_color() {
        assert!(is_valid_hex_color("#EF4444"));
        assert!(is_valid_hex_color("#ef4444"));
        assert!(!is_valid_hex_color("EF4444"));
        assert!(!is_valid_hex_color("#EF444"));
        assert!(!is_valid_hex_color("#EF44445"));
        assert!(!is_valid_hex_color("#GG4444"));
        assert!(!is_valid_hex_color(""));
    }

    #[test]
    fn test_update_project_is_empty() {
        assert!(UpdateProject::default().is_empty());
        let update = UpdateProject {
            is_archived: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
