//! Validation of LLM prediction output
//!
//! Single boundary between the model's duck-typed JSON and typed predictions.

use std::collections::HashSet;

use crate::model::predictions::{ExtractedExplanation, ExtractedPredictions};

/// Result of output validation
#[derive(Debug)]
pub struct OutputValidationResult {
    /// Whether the output passed validation
    pub is_valid: bool,
    /// Critical errors that make the output unusable
    pub errors: Vec<String>,
    /// Warnings that indicate potential quality issues
    pub warnings: Vec<String>,
}

impl OutputValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Validate extracted fraud predictions
///
/// Checks:
/// 1. Every prediction names a claim id
/// 2. Every likelihood is a finite number in [0, 1]
/// 3. Claim ids are not repeated (warning)
/// 4. Risk factors are provided (warning)
pub fn validate_predictions(output: &ExtractedPredictions) -> OutputValidationResult {
    let mut result = OutputValidationResult::valid();
    let mut seen = HashSet::new();

    for (i, prediction) in output.fraud_predictions.iter().enumerate() {
        let claim_id = prediction.claim_id.trim();

        if claim_id.is_empty() {
            result.add_error(format!("Prediction {} has an empty claimId", i + 1));
            continue;
        }

        let likelihood = prediction.fraud_likelihood;
        if !likelihood.is_finite() || !(0.0..=1.0).contains(&likelihood) {
            result.add_error(format!(
                "Prediction for claim '{}' has fraudLikelihood {} outside [0, 1]",
                claim_id, likelihood
            ));
        }

        if !seen.insert(claim_id.to_string()) {
            result.add_warning(format!("Claim '{}' has more than one prediction", claim_id));
        }

        if prediction.risk_factors.is_empty() {
            result.add_warning(format!("Prediction for claim '{}' lists no risk factors", claim_id));
        }
    }

    result
}

/// Validate an extracted explanation
pub fn validate_explanation(output: &ExtractedExplanation) -> OutputValidationResult {
    let mut result = OutputValidationResult::valid();

    let text = output.risk_factors_explanation.trim();
    if text.is_empty() {
        result.add_error("Explanation is empty".to_string());
    } else if text.len() < 20 {
        result.add_warning(format!("Explanation is very short ({} chars)", text.len()));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::predictions::ExtractedPrediction;

    fn prediction(claim_id: &str, likelihood: f64, factors: &[&str]) -> ExtractedPrediction {
        ExtractedPrediction {
            claim_id: claim_id.to_string(),
            fraud_likelihood: likelihood,
            risk_factors: factors.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_predictions() {
        let output = ExtractedPredictions {
            fraud_predictions: vec![
                prediction("1", 0.85, &["High claim amount"]),
                prediction("2", 0.0, &["Consistent history"]),
                prediction("3", 1.0, &["Total loss"]),
            ],
        };

        let result = validate_predictions(&output);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_likelihood_out_of_range() {
        let output = ExtractedPredictions {
            fraud_predictions: vec![
                prediction("1", 1.5, &["x"]),
                prediction("2", -0.1, &["x"]),
                prediction("3", f64::NAN, &["x"]),
            ],
        };

        let result = validate_predictions(&output);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors[0].contains("outside [0, 1]"));
    }

    #[test]
    fn test_empty_claim_id_is_error() {
        let output = ExtractedPredictions {
            fraud_predictions: vec![prediction("  ", 0.5, &["x"])],
        };

        let result = validate_predictions(&output);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("empty claimId"));
    }

    #[test]
    fn test_duplicates_and_missing_factors_are_warnings() {
        let output = ExtractedPredictions {
            fraud_predictions: vec![prediction("1", 0.5, &[]), prediction("1", 0.6, &["x"])],
        };

        let result = validate_predictions(&output);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings.iter().any(|w| w.contains("more than one")));
        assert!(result.warnings.iter().any(|w| w.contains("no risk factors")));
    }

    #[test]
    fn test_empty_explanation_is_error() {
        let output = ExtractedExplanation {
            risk_factors_explanation: "   ".to_string(),
        };
        assert!(!validate_explanation(&output).is_valid);
    }

    #[test]
    fn test_short_explanation_is_warning() {
        let output = ExtractedExplanation {
            risk_factors_explanation: "High amount.".to_string(),
        };
        let result = validate_explanation(&output);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }
}
