//! Fraud prediction client using LLM
//!
//! Scores claim batches and explains claim risk through two fixed prompts.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::providers::openai;

use crate::model::FraudPrediction;
use crate::model::predictions::{ExtractedExplanation, ExtractedPredictions};
use crate::service::cache::ExplanationCache;
use crate::service::cache_keys::generate_explanation_cache_key;
use crate::service::llm::LlmClient;

pub mod error;
pub mod prompts;
pub mod validation;

pub use error::{ExplanationError, PredictionError};

use prompts::{
    EXPLANATION_SYSTEM_PROMPT, PREDICTION_SYSTEM_PROMPT, build_explanation_prompt,
    build_prediction_prompt,
};
use validation::{validate_explanation, validate_predictions};

/// Environment variable for the fraud scoring model
const ENV_PREDICTION_MODEL: &str = "PREDICTION_MODEL";

/// Environment variable for the explanation model
const ENV_EXPLANATION_MODEL: &str = "EXPLANATION_MODEL";

const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// External model contract: one scoring call and one explanation call
///
/// Each call is a single attempt; there is no retry and no timeout.
#[async_trait]
pub trait FraudModel: Send + Sync {
    /// Score every claim in `claim_data` (CSV text)
    async fn predict(&self, claim_data: &str) -> Result<Vec<FraudPrediction>, PredictionError>;

    /// Explain the fraud risk of a claim summary in plain language
    async fn explain(
        &self,
        claim_summary: &str,
        model_parameters: &str,
    ) -> Result<String, ExplanationError>;
}

/// `FraudModel` backed by OpenAI structured extraction
pub struct LlmPredictionClient {
    llm_client: LlmClient,
    prediction_model: String,
    explanation_model: String,
    cache: Option<ExplanationCache>,
}

impl LlmPredictionClient {
    /// Creates a new prediction client
    ///
    /// Models come from `PREDICTION_MODEL` and `EXPLANATION_MODEL`
    /// (both default to gpt-4o-mini).
    pub fn new(llm_client: LlmClient, cache: Option<ExplanationCache>) -> Self {
        let prediction_model = LlmClient::model_from_env(ENV_PREDICTION_MODEL, DEFAULT_MODEL);
        let explanation_model = LlmClient::model_from_env(ENV_EXPLANATION_MODEL, DEFAULT_MODEL);

        tracing::info!(
            prediction_model = %prediction_model,
            explanation_model = %explanation_model,
            cache_enabled = cache.is_some(),
            "Prediction client initialized"
        );

        Self {
            llm_client,
            prediction_model,
            explanation_model,
            cache,
        }
    }

    async fn cached_explanation(&self, key: &str) -> Option<String> {
        let cache = self.cache.as_ref()?;
        cache.get_explanation(key).await.ok()
    }

    async fn cache_explanation(&self, key: &str, explanation: &str) {
        if let Some(ref cache) = self.cache
            && let Err(e) = cache.set_explanation(key, explanation).await
        {
            tracing::debug!(error = %e, "Failed to cache explanation");
        }
    }
}

#[async_trait]
impl FraudModel for LlmPredictionClient {
    async fn predict(&self, claim_data: &str) -> Result<Vec<FraudPrediction>, PredictionError> {
        let start_time = std::time::Instant::now();

        let prompt = build_prediction_prompt(claim_data);
        let prompt_length = prompt.len();

        tracing::debug!(
            model = %self.prediction_model,
            prompt_length = prompt_length,
            "Initiating OpenAI API call for fraud prediction"
        );

        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<ExtractedPredictions>(&self.prediction_model)
            .preamble(PREDICTION_SYSTEM_PROMPT)
            .additional_params(serde_json::json!({
                "temperature": 0.0
            }))
            .build();

        let extracted = match extractor.extract(&prompt).await {
            Ok(result) => {
                tracing::info!(
                    model = %self.prediction_model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    predictions = result.fraud_predictions.len(),
                    prompt_length = prompt_length,
                    "OpenAI API call for fraud prediction completed successfully"
                );
                result
            }
            Err(e) => {
                tracing::error!(
                    model = %self.prediction_model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "OpenAI API call for fraud prediction failed"
                );
                return Err(PredictionError::CallFailed(e.to_string()));
            }
        };

        let validation_result = validate_predictions(&extracted);

        if !validation_result.is_valid {
            tracing::error!(
                errors = ?validation_result.errors,
                "Fraud prediction output failed validation"
            );
            return Err(PredictionError::InvalidOutput(
                validation_result.errors.join("; "),
            ));
        }

        if !validation_result.warnings.is_empty() {
            tracing::warn!(
                warnings = ?validation_result.warnings,
                "Fraud prediction output produced quality warnings"
            );
        }

        Ok(extracted
            .fraud_predictions
            .into_iter()
            .map(FraudPrediction::from)
            .collect())
    }

    async fn explain(
        &self,
        claim_summary: &str,
        model_parameters: &str,
    ) -> Result<String, ExplanationError> {
        let cache_key = generate_explanation_cache_key(
            claim_summary,
            model_parameters,
            &self.explanation_model,
        );

        if let Some(cached) = self.cached_explanation(&cache_key).await {
            tracing::debug!(key = %cache_key, "Cache hit for explanation");
            return Ok(cached);
        }

        let start_time = std::time::Instant::now();
        let prompt = build_explanation_prompt(claim_summary, model_parameters);

        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<ExtractedExplanation>(&self.explanation_model)
            .preamble(EXPLANATION_SYSTEM_PROMPT)
            .build();

        let extracted = extractor.extract(&prompt).await.map_err(|e| {
            tracing::error!(
                model = %self.explanation_model,
                elapsed_ms = start_time.elapsed().as_millis(),
                error = %e,
                "OpenAI API call for risk explanation failed"
            );
            ExplanationError::CallFailed(e.to_string())
        })?;

        tracing::info!(
            model = %self.explanation_model,
            elapsed_ms = start_time.elapsed().as_millis(),
            "OpenAI API call for risk explanation completed successfully"
        );

        let validation_result = validate_explanation(&extracted);
        if !validation_result.is_valid {
            return Err(ExplanationError::InvalidOutput(
                validation_result.errors.join("; "),
            ));
        }

        let explanation = extracted.risk_factors_explanation.trim().to_string();
        self.cache_explanation(&cache_key, &explanation).await;

        Ok(explanation)
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted `FraudModel` for controller and API tests

    use std::sync::Mutex;

    use super::*;

    pub struct FakeFraudModel {
        pub predictions: Result<Vec<FraudPrediction>, String>,
        pub explanation: Result<String, String>,
        pub predict_calls: Mutex<Vec<String>>,
    }

    impl FakeFraudModel {
        pub fn scoring(predictions: Vec<FraudPrediction>) -> Self {
            Self {
                predictions: Ok(predictions),
                explanation: Ok("Large claim relative to the policy history.".to_string()),
                predict_calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                predictions: Err("quota exceeded".to_string()),
                explanation: Err("quota exceeded".to_string()),
                predict_calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.predict_calls.lock().map(|c| c.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl FraudModel for FakeFraudModel {
        async fn predict(
            &self,
            claim_data: &str,
        ) -> Result<Vec<FraudPrediction>, PredictionError> {
            if let Ok(mut calls) = self.predict_calls.lock() {
                calls.push(claim_data.to_string());
            }
            self.predictions
                .clone()
                .map_err(PredictionError::CallFailed)
        }

        async fn explain(
            &self,
            _claim_summary: &str,
            _model_parameters: &str,
        ) -> Result<String, ExplanationError> {
            self.explanation.clone().map_err(ExplanationError::CallFailed)
        }
    }

    pub fn prediction(claim_id: &str, likelihood: f64, factors: &[&str]) -> FraudPrediction {
        FraudPrediction {
            claim_id: claim_id.to_string(),
            fraud_likelihood: likelihood,
            risk_factors: factors.iter().map(|f| f.to_string()).collect(),
        }
    }
}
