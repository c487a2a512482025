/// Access-layer error types
///
/// Plain reads and scoped mutations return `sqlx::Error` directly: a row that
/// does not exist or belongs to someone else is reported as `None` / `false`,
/// not as an error. `AccessError` is only returned by operations that carry a
/// cross-entity precondition, i.e. attaching a note or task to a project (or a
/// task to a note) that must belong to the acting user.

use uuid::Uuid;

/// Error type for access-layer operations with ownership preconditions
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Referenced project doesn't exist or belongs to another user
    #[error("Project {0} not found for this user")]
    ProjectNotOwned(Uuid),

    /// Referenced note doesn't exist or its project belongs to another user
    #[error("Note {0} not found for this user")]
    NoteNotOwned(Uuid),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AccessError {
    /// Whether the error is an ownership precondition failure (as opposed to
    /// a storage failure)
    pub fn is_ownership_violation(&self) -> bool {
        matches!(
            self,
            AccessError::ProjectNotOwned(_) | AccessError::NoteNotOwned(_)
        )
    }
}

/// Result alias for access-layer operations with ownership preconditions
pub type AccessResult<T> = Result<T, AccessError>;
