//! Schema of the namespace cache.

use sqlx::{Pool, Sqlite};

use crate::error_handling::DatabaseError;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS namespace_names (
        dbname TEXT NOT NULL,
        namespace_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        fetched_at_ms INTEGER NOT NULL,
        PRIMARY KEY (dbname, namespace_id)
    )",
];

/// Creates missing tables. Safe to run on every start.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
