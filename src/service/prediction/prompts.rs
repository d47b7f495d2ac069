//! Prompt templates for fraud scoring and risk explanation

/// System prompt for fraud likelihood prediction
pub const PREDICTION_SYSTEM_PROMPT: &str = r#"You are an expert in insurance fraud detection.

Analyze insurance claim data and predict the likelihood of fraud for each claim.
Also extract the key risk factors for each claim.

You must:
- Return exactly one prediction per claim, using the claim ID from the data
- Express fraud likelihood as a number between 0 and 1
- List concrete risk factors drawn from the claim's own fields

Your output must be structured JSON only and conform to the requested schema."#;

/// System prompt for the plain-language risk explanation
pub const EXPLANATION_SYSTEM_PROMPT: &str = r#"You explain insurance fraud risk to claims handlers.

Analyze the insurance claim summary and model parameters to identify key fraud risk factors.
Provide a concise, plain-language explanation.

Your output must be structured JSON only and conform to the requested schema."#;

/// Description of the scoring approach passed to every explanation request
pub const MODEL_PARAMETERS: &str =
    "Using a classification model focusing on claim history, amount, and incident consistency.";

/// Build the fraud prediction prompt for a batch of claims in CSV form
pub fn build_prediction_prompt(claim_data: &str) -> String {
    format!(
        r#"Analyze the provided insurance claim data and predict the likelihood of fraud for each claim. Also extract key risk factors for each claim.

Claim Data (CSV):
{claim_data}

Output the fraud predictions in JSON format. Include the claim ID, fraud likelihood (a number between 0 and 1), and a list of key risk factors that influence the prediction.

Example Output Format:
{{
  "fraudPredictions": [
    {{
      "claimId": "123",
      "fraudLikelihood": 0.85,
      "riskFactors": ["Inconsistent claim history", "High claim amount compared to policy"]
    }},
    {{
      "claimId": "456",
      "fraudLikelihood": 0.20,
      "riskFactors": ["Consistent claim history", "Low claim amount"]
    }}
  ]
}}
"#
    )
}

/// Build the explanation prompt from a claim summary and model parameters
pub fn build_explanation_prompt(claim_summary: &str, model_parameters: &str) -> String {
    format!(
        "Claim Data Summary: {claim_summary}\nModel Parameters: {model_parameters}\n\nExplanation of Risk Factors:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_prompt_embeds_csv() {
        let prompt = build_prediction_prompt("claim_id,total_claim_amount\n1,100");
        assert!(prompt.contains("Claim Data (CSV):\nclaim_id,total_claim_amount\n1,100"));
        assert!(prompt.contains("\"fraudPredictions\": ["));
    }

    #[test]
    fn test_explanation_prompt_layout() {
        let prompt = build_explanation_prompt("Claim ID 1 ...", MODEL_PARAMETERS);
        assert!(prompt.starts_with("Claim Data Summary: Claim ID 1 ..."));
        assert!(prompt.contains("Model Parameters: Using a classification model"));
        assert!(prompt.ends_with("Explanation of Risk Factors:"));
    }
}
