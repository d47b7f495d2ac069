use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::FraudPrediction;

/// Fraud scoring output from the LLM
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPredictions {
    /// Predictions for each claim in the input data
    #[schemars(description = "Predictions for each claim in the input data.")]
    pub fraud_predictions: Vec<ExtractedPrediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPrediction {
    #[schemars(description = "The ID of the claim.")]
    pub claim_id: String,

    #[schemars(description = "The predicted likelihood of fraud for the claim (0-1).")]
    pub fraud_likelihood: f64,

    #[schemars(description = "Key risk factors influencing the prediction.")]
    pub risk_factors: Vec<String>,
}

impl From<ExtractedPrediction> for FraudPrediction {
    fn from(p: ExtractedPrediction) -> Self {
        FraudPrediction {
            claim_id: p.claim_id.trim().to_string(),
            fraud_likelihood: p.fraud_likelihood,
            risk_factors: p.risk_factors,
        }
    }
}

/// Plain-language risk explanation from the LLM
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedExplanation {
    #[schemars(
        description = "A plain language explanation of the key risk factors contributing to potential fraud, derived from the claim data and model parameters."
    )]
    pub risk_factors_explanation: String,
}
