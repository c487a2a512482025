/// Entity models for Synapse
///
/// This module contains the four entity models and their ownership-scoped
/// database operations. Every read is filtered by the requesting user's id,
/// either directly (`projects.user_id`, `tasks.user_id`) or through the
/// parent project (notes).
///
/// # Models
///
/// - `user`: Identity-provider user ids
/// - `project`: Color-coded containers owned by a user
/// - `note`: Rich-text documents inside a project
/// - `task`: Dated, completable work items inside a project
///
/// # Example
///
/// ```no_run
/// use synapse_shared::models::project::{Project, CreateProject};
/// use synapse_shared::db::pool::{connect, PoolSize};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = connect("postgresql://localhost/synapse", PoolSize::default()).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     user_id: "user_2abc".to_string(),
///     name: "Work".to_string(),
///     color: None, // random palette color
/// }).await?;
///
/// let mine = Project::list_by_user(&pool, "user_2abc").await?;
/// assert!(mine.iter().any(|p| p.id == project.id));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Deserializer};

pub mod note;
pub mod project;
pub mod task;
pub mod user;

/// Deserializes a field that distinguishes "absent" from "null"
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>`: a missing field stays `None`, an explicit `null`
/// becomes `Some(None)`, and a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
