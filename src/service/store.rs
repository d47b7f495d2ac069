//! Bounded store of recent analyses
//!
//! The in-memory list is the source of truth for the running session; every
//! change is mirrored to an injected storage port on a best-effort basis.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::Analysis;

/// Maximum number of analyses kept
pub const MAX_ANALYSES: usize = 5;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Persistent storage port holding the whole analysis list
#[async_trait]
pub trait AnalysisStorage: Send + Sync {
    /// Load the stored list (newest first); empty when nothing was saved
    async fn load(&self) -> Result<Vec<Analysis>, StorageError>;

    /// Replace the stored list
    async fn save(&self, analyses: &[Analysis]) -> Result<(), StorageError>;
}

/// Storage kept in process memory
///
/// Round-trips through JSON so it behaves like the persistent backends.
#[derive(Default)]
pub struct InMemoryAnalysisStorage {
    value: Mutex<Option<String>>,
}

impl InMemoryAnalysisStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-loaded with a raw payload
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(payload.into())),
        }
    }
}

#[async_trait]
impl AnalysisStorage for InMemoryAnalysisStorage {
    async fn load(&self) -> Result<Vec<Analysis>, StorageError> {
        let guard = self
            .value
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        match guard.as_deref() {
            Some(json) => {
                serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, analyses: &[Analysis]) -> Result<(), StorageError> {
        let json = serde_json::to_string(analyses)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut guard = self
            .value
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(json);
        Ok(())
    }
}

/// Most-recent-first list of at most `MAX_ANALYSES` analyses
pub struct AnalysisStore {
    analyses: Vec<Analysis>,
    storage: Box<dyn AnalysisStorage>,
}

impl AnalysisStore {
    /// Open the store, loading whatever the storage holds
    ///
    /// Unreadable or undecodable data is logged and treated as empty.
    pub async fn open(storage: Box<dyn AnalysisStorage>) -> Self {
        let mut analyses = match storage.load().await {
            Ok(analyses) => analyses,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load saved analyses");
                Vec::new()
            }
        };
        analyses.truncate(MAX_ANALYSES);

        tracing::info!(count = analyses.len(), "Analysis store opened");

        Self { analyses, storage }
    }

    pub fn list(&self) -> &[Analysis] {
        &self.analyses
    }

    pub fn get(&self, id: &str) -> Option<&Analysis> {
        self.analyses.iter().find(|a| a.id == id)
    }

    /// Insert or replace `analysis` at the front, keeping the newest five
    pub async fn upsert(&mut self, analysis: Analysis) {
        self.analyses.retain(|a| a.id != analysis.id);
        self.analyses.insert(0, analysis);
        self.analyses.truncate(MAX_ANALYSES);
        self.persist().await;
    }

    /// Remove an analysis by id; returns whether it existed
    pub async fn delete(&mut self, id: &str) -> bool {
        let before = self.analyses.len();
        self.analyses.retain(|a| a.id != id);
        let deleted = self.analyses.len() < before;

        if deleted {
            self.persist().await;
            tracing::debug!(id = %id, "Deleted analysis");
        }

        deleted
    }

    async fn persist(&self) {
        if let Err(e) = self.storage.save(&self.analyses).await {
            tracing::error!(error = %e, "Failed to save analyses");
        }
    }
}
