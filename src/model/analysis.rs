use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::{Claim, FraudPrediction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AnalysisStatus {
    Processing,
    Completed,
    Failed,
}

/// One upload-to-report run
///
/// Serialized in camelCase; this is also the persisted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: String,
    pub file_name: String,
    pub date: DateTime<Utc>,
    pub status: AnalysisStatus,
    pub claims: Vec<Claim>,
    pub predictions: Vec<FraudPrediction>,
    pub is_sample: bool,
}

impl Analysis {
    /// Start a new analysis in the `Processing` state
    pub fn processing(file_name: impl Into<String>, claims: Vec<Claim>, is_sample: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            date: Utc::now(),
            status: AnalysisStatus::Processing,
            claims,
            predictions: Vec::new(),
            is_sample,
        }
    }

    pub fn completed(self, predictions: Vec<FraudPrediction>) -> Self {
        Self {
            status: AnalysisStatus::Completed,
            predictions,
            ..self
        }
    }

    pub fn failed(self) -> Self {
        Self {
            status: AnalysisStatus::Failed,
            ..self
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == AnalysisStatus::Completed
    }
}
