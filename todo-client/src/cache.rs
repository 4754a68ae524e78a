use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};

use todo_core::models::Todo;

use crate::errors::ClientError;
use crate::queries::Queries;

/// Fixed key the collection snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "todos";

/// Best-effort durable mirror of the item collection, used as a fallback when
/// the gateway is unreachable on load. One JSON snapshot under one fixed key;
/// no eviction, no size bound, no schema versioning.
pub struct CacheMirror {
    pub(crate) pool: SqlitePool,
}

impl CacheMirror {
    pub async fn new(database_url: &str) -> Result<Self, ClientError> {
        // Single connection: an in-memory database is per-connection, and the
        // snapshot table must survive across calls.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        sqlx::query(Queries::SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Serialize and persist the full collection, replacing any prior
    /// snapshot.
    pub async fn save(&self, items: &[Todo]) -> Result<(), ClientError> {
        let data = serde_json::to_string(items)?;

        sqlx::query(Queries::UPSERT_SNAPSHOT)
            .bind(SNAPSHOT_KEY)
            .bind(data)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Read the snapshot back verbatim (no reordering). Optional fields
    /// missing from older snapshots take their declared defaults during
    /// deserialization. `None` when no snapshot has been written yet.
    pub async fn load(&self) -> Result<Option<Vec<Todo>>, ClientError> {
        let row = sqlx::query(Queries::GET_SNAPSHOT)
            .bind(SNAPSHOT_KEY)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let data: String = row.get("data");
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => Ok(None),
        }
    }
}
