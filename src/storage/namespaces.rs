//! Persisted namespace names.

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::{Pool, Row, Sqlite};

use crate::error_handling::DatabaseError;

/// Namespace names of many wikis, keyed by database name and namespace id.
#[derive(Clone)]
pub struct NamespaceStore {
    pool: Arc<Pool<Sqlite>>,
}

impl NamespaceStore {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    /// All names stored for one wiki.
    pub async fn load_wiki(&self, dbname: &str) -> Result<HashMap<i32, String>, DatabaseError> {
        let rows = sqlx::query("SELECT namespace_id, name FROM namespace_names WHERE dbname = ?")
            .bind(dbname)
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(rows
            .iter()
            .map(|row| (row.get::<i32, _>("namespace_id"), row.get::<String, _>("name")))
            .collect())
    }

    /// Replaces every stored name of one wiki, in one transaction.
    pub async fn put_wiki(
        &self,
        dbname: &str,
        names: &HashMap<i32, String>,
    ) -> Result<(), DatabaseError> {
        let fetched_at_ms = chrono::Utc::now().timestamp_millis();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM namespace_names WHERE dbname = ?")
            .bind(dbname)
            .execute(&mut *tx)
            .await?;
        for (namespace_id, name) in names {
            sqlx::query(
                "INSERT INTO namespace_names (dbname, namespace_id, name, fetched_at_ms)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(dbname)
            .bind(namespace_id)
            .bind(name)
            .bind(fetched_at_ms)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
