/// Database layer for Synapse
///
/// This module provides connection pooling and the migration runner for the
/// four-table schema (users, projects, notes, tasks).
///
/// # Modules
///
/// - `pool`: Connection pool sizing, ping and stats
/// - `migrations`: Embedded migration runner and database bootstrap helpers
/// - Entity access lives in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use synapse_shared::db::{migrations, pool};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let url = std::env::var("DATABASE_URL")?;
///     let db = pool::connect(&url, pool::PoolSize::default()).await?;
///     migrations::run_migrations(&db).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
