//! Database models for the key-value table

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::FromRow;

use super::DbError;

/// Database representation of one key-value entry
#[derive(Debug, Clone, FromRow)]
pub struct KvRow {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl KvRow {
    /// Decode the stored JSON value
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, DbError> {
        serde_json::from_value(self.value).map_err(|e| {
            DbError::Serialization(format!("Invalid value for key '{}': {}", self.key, e))
        })
    }
}
