//! Integration tests for database migrations
//!
//! These tests require a running PostgreSQL database and are skipped when
//! DATABASE_URL is unset.

mod common;

use synapse_shared::db::migrations::{ensure_database_exists, get_migration_status, run_migrations};
use synapse_shared::db::pool;

#[tokio::test]
async fn test_ensure_database_exists() {
    let Some(url) = common::database_url() else { return };

    let result = ensure_database_exists(&url).await;
    assert!(result.is_ok(), "Failed to ensure database exists: {:?}", result.err());
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(db) = common::test_pool().await else { return };

    let status_1 = get_migration_status(&db).await.expect("Failed to get status");

    run_migrations(&db).await.expect("Second migration run failed");

    let status_2 = get_migration_status(&db).await.expect("Failed to get status");

    assert_eq!(status_1.applied_migrations, status_2.applied_migrations);
    assert!(status_2.latest_version.is_some(), "Latest version should be set");
    assert!(status_2.is_up_to_date, "Should be up to date after migrations");

    pool::close(db).await;
}

#[tokio::test]
async fn test_migration_creates_all_tables() {
    let Some(db) = common::test_pool().await else { return };

    for table_name in ["users", "projects", "notes", "tasks"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = 'public'
                AND table_name = $1
            )",
        )
        .bind(table_name)
        .fetch_one(&db)
        .await
        .unwrap_or_else(|e| panic!("Failed to check for table {}: {}", table_name, e));

        assert!(exists, "Table '{}' should exist after migrations", table_name);
    }

    pool::close(db).await;
}

#[tokio::test]
async fn test_schema_rejects_invalid_project_color() {
    let Some(db) = common::test_pool().await else { return };
    let (user_id, _) = common::new_user(&db).await;

    let result = sqlx::query("INSERT INTO projects (user_id, name, color) VALUES ($1, 'Bad', 'red')")
        .bind(&user_id)
        .execute(&db)
        .await;

    assert!(result.is_err(), "Color CHECK constraint should reject non-hex colors");

    pool::close(db).await;
}
