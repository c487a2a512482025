/// Database migration runner
///
/// Migrations live in the workspace-level `migrations/` directory and are
/// embedded into the binary at compile time, so a deployed server never reads
/// SQL from disk. Each migration is a reversible pair:
/// - `{timestamp}_{name}.up.sql`
/// - `{timestamp}_{name}.down.sql`
///
/// # Example
///
/// ```no_run
/// use synapse_shared::db::pool::{self, PoolSize};
/// use synapse_shared::db::migrations::{run_migrations, get_migration_status};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = pool::connect(&std::env::var("DATABASE_URL")?, PoolSize::default()).await?;
///
///     run_migrations(&pool).await?;
///
///     let status = get_migration_status(&pool).await?;
///     println!("Applied {} migrations", status.applied_migrations);
///
///     Ok(())
/// }
/// ```

use sqlx::{
    migrate::{MigrateDatabase, Migrator},
    postgres::PgPool,
    Postgres,
};
use tracing::{debug, info, warn};

/// Embedded schema migrations (users, projects, notes, tasks)
pub static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of migrations that have been applied
    pub applied_migrations: usize,

    /// Latest applied migration version (timestamp)
    pub latest_version: Option<i64>,

    /// Whether every embedded migration has been applied
    pub is_up_to_date: bool,
}

/// Runs all pending database migrations
///
/// Already-applied migrations are skipped, so this is safe to call on every
/// server start.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or if an applied
/// migration's checksum no longer matches the embedded file.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(
        embedded = MIGRATOR.iter().count(),
        "Starting database migrations"
    );

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Gets the current migration status
///
/// # Errors
///
/// Returns an error if the migrations table cannot be queried.
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
            is_up_to_date: false,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT
            COUNT(*) as count,
            MAX(version) as latest_version
         FROM _sqlx_migrations
         WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    let embedded_latest = MIGRATOR.iter().map(|m| m.version).max();

    debug!(
        applied_migrations = count,
        latest_version = ?latest_version,
        embedded_latest = ?embedded_latest,
        "Migration status retrieved"
    );

    Ok(MigrationStatus {
        applied_migrations: count as usize,
        latest_version,
        is_up_to_date: latest_version.is_some() && latest_version == embedded_latest,
    })
}

/// Creates the database if it doesn't exist
///
/// Useful for development and testing. In production the database should
/// already exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    info!("Checking if database exists");

    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
        info!("Database created successfully");
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
