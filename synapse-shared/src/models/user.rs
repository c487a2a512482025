/// User model and database operations
///
/// Users are issued by the external identity provider; Synapse only records
/// the opaque id so that projects and tasks have something to reference.
/// Rows are created by [`crate::provisioning::provision_user`] on first
/// sign-in.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id TEXT PRIMARY KEY,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// User identity record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Opaque id issued by the identity provider (the token's `sub`)
    pub id: String,

    /// When the user was first provisioned
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Inserts a user row unless one already exists
    ///
    /// Generic over the executor so provisioning can run it inside a
    /// transaction.
    ///
    /// # Returns
    ///
    /// The new row, or `None` if the user was already present
    pub async fn insert_if_absent<'e, E>(executor: E, id: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id)
            VALUES ($1)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use synapse_shared::models::user::User;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// if let Some(user) = User::find_by_id(&pool, "user_2abc").await? {
    ///     println!("Provisioned at {}", user.created_at);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Deletes a user by id
    ///
    /// ⚠️  **WARNING**: This cascades to every project, note and task the user owns.
    ///
    /// # Returns
    ///
    /// True if the user was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
