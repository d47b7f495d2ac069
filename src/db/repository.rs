//! PostgreSQL-backed analysis storage

use async_trait::async_trait;
use sqlx::PgPool;

use super::DbError;
use super::models::KvRow;
use crate::model::Analysis;
use crate::service::store::{AnalysisStorage, StorageError};

/// Fixed key the analysis list is stored under
pub const ANALYSES_KEY: &str = "claimGuardAnalyses";

/// Stores the whole analysis list as one JSON array row
#[derive(Clone)]
pub struct PgAnalysisStorage {
    pool: PgPool,
}

impl PgAnalysisStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self) -> Result<Option<KvRow>, DbError> {
        let row: Option<KvRow> = sqlx::query_as(
            r#"
            SELECT key, value, updated_at FROM kv_store WHERE key = $1
            "#,
        )
        .bind(ANALYSES_KEY)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn store(&self, value: serde_json::Value) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(ANALYSES_KEY)
        .bind(&value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl From<DbError> for StorageError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Connection(e) => StorageError::Unavailable(e.to_string()),
            DbError::Serialization(msg) => StorageError::Serialization(msg),
        }
    }
}

#[async_trait]
impl AnalysisStorage for PgAnalysisStorage {
    async fn load(&self) -> Result<Vec<Analysis>, StorageError> {
        match self.fetch().await? {
            Some(row) => {
                tracing::debug!(updated_at = %row.updated_at, "Loaded saved analyses");
                Ok(row.decode()?)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, analyses: &[Analysis]) -> Result<(), StorageError> {
        let value = serde_json::to_value(analyses)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store(value).await?;

        tracing::debug!(count = analyses.len(), "Saved analyses");
        Ok(())
    }
}
