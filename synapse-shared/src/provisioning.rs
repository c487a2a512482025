/// User provisioning
///
/// On first sign-in the identity provider hands us a user id we have never
/// seen. Provisioning records it and gives the user a default "Personal"
/// project. Both inserts run in one transaction, so a failure after the user
/// row is written never leaves a user without a project.
///
/// Provisioning is idempotent: calling it for an existing user changes
/// nothing and reports `created: false`.
///
/// # Example
///
/// ```no_run
/// use synapse_shared::provisioning::provision_user;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let provisioned = provision_user(&pool, "user_2abc").await?;
/// if let Some(project) = provisioned.default_project {
///     assert_eq!(project.name, "Personal");
/// }
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::models::{
    project::{CreateProject, Project, DEFAULT_PROJECT_COLOR},
    user::User,
};

/// Name of the project every new user starts with
pub const DEFAULT_PROJECT_NAME: &str = "Personal";

/// Outcome of [`provision_user`]
#[derive(Debug, Clone, Serialize)]
pub struct Provisioned {
    /// The user row (new or existing)
    pub user: User,

    /// The default project, when this call created it
    pub default_project: Option<Project>,

    /// Whether this call created the user
    pub created: bool,
}

/// Provisions a user on first sign-in
///
/// Inserts the user row if absent and, only when it was absent, the default
/// "Personal" project. Both statements share one transaction.
///
/// # Errors
///
/// Returns an error if the database fails; the transaction is rolled back and
/// neither row is written.
pub async fn provision_user(pool: &PgPool, user_id: &str) -> Result<Provisioned, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(user) = User::insert_if_absent(&mut *tx, user_id).await? else {
        // Already provisioned; nothing was written.
        tx.rollback().await?;

        let user = User::find_by_id(pool, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        debug!(user_id = %user_id, "User already provisioned");
        return Ok(Provisioned {
            user,
            default_project: None,
            created: false,
        });
    };

    let project = Project::create(
        &mut *tx,
        CreateProject {
            user_id: user.id.clone(),
            name: DEFAULT_PROJECT_NAME.to_string(),
            color: Some(DEFAULT_PROJECT_COLOR.to_string()),
        },
    )
    .await?;

    tx.commit().await?;

    info!(user_id = %user.id, project_id = %project.id, "Provisioned new user");

    Ok(Provisioned {
        user,
        default_project: Some(project),
        created: true,
    })
}
