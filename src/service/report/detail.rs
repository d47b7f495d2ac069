//! Claim detail and risk-factor panels
//!
//! Builds the summaries sent to the explanation prompt and the view models
//! that show the resulting text.

use serde::Serialize;
use utoipa::ToSchema;

use super::{format_number, format_percent};
use crate::model::{
    CLAIM_AMOUNT_COLUMN, Claim, ClaimWithPrediction, DRIVER_RATING_COLUMN, INCIDENT_TYPE_COLUMN,
    RiskCategory,
};

/// Shown in the detail panel when the explanation call fails
pub const DETAIL_EXPLANATION_FALLBACK: &str =
    "Could not generate a detailed explanation for this claim.";

/// Shown in the risk-factors panel when the explanation call fails
pub const PANEL_EXPLANATION_FALLBACK: &str = "Could not retrieve risk factor analysis.";

/// Shown in the risk-factors panel when there is nothing to explain
pub const PANEL_PLACEHOLDER: &str =
    "Select a claim to see a detailed explanation or upload a dataset to see a summary.";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DetailItem {
    pub label: String,
    pub value: String,
}

const ID_FIELD: &str = "id";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClaimDetail {
    pub id: String,
    pub likelihood: f64,
    pub likelihood_display: String,
    pub risk_category: RiskCategory,
    pub risk_factors: Vec<String>,
    pub explanation: String,
    pub fields: Vec<DetailItem>,
}

impl ClaimDetail {
    pub fn new(item: &ClaimWithPrediction, explanation: String) -> Self {
        let likelihood = item.likelihood();

        // An uploaded `id` column shows the claim id in its own position
        let mut fields: Vec<DetailItem> = item
            .claim
            .fields
            .iter()
            .map(|f| DetailItem {
                label: field_label(&f.name),
                value: if f.name == ID_FIELD {
                    item.claim.id.clone()
                } else {
                    f.value.to_string()
                },
            })
            .collect();
        if !item.claim.fields.iter().any(|f| f.name == ID_FIELD) {
            fields.push(DetailItem {
                label: field_label(ID_FIELD),
                value: item.claim.id.clone(),
            });
        }

        Self {
            id: item.claim.id.clone(),
            likelihood,
            likelihood_display: format_percent(likelihood),
            risk_category: RiskCategory::from_likelihood(likelihood),
            risk_factors: item
                .prediction
                .as_ref()
                .map(|p| p.risk_factors.clone())
                .unwrap_or_default(),
            explanation,
            fields,
        }
    }
}

/// The "Key Risk Factors" panel next to the chart
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RiskFactorsPanel {
    pub title: String,
    pub description: String,
    pub explanation: String,
}

impl RiskFactorsPanel {
    pub fn new(selected_claim_id: Option<&str>, explanation: String) -> Self {
        let description = match selected_claim_id {
            Some(id) => format!("AI-powered explanation for Claim ID: {}", id),
            None => "AI-powered summary of common fraud indicators in this dataset.".to_string(),
        };

        Self {
            title: "Key Risk Factors".to_string(),
            description,
            explanation,
        }
    }
}

/// `total_claim_amount` → `Total Claim Amount`
pub fn field_label(name: &str) -> String {
    name.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary of one claim for the detail panel explanation
pub fn claim_summary(claim: &Claim) -> String {
    format!(
        "Claim ID {} has a total claim amount of {}. Incident Type: {}. Driver rating is {}.",
        claim.id,
        claim.display(CLAIM_AMOUNT_COLUMN),
        claim.display(INCIDENT_TYPE_COLUMN),
        claim.display(DRIVER_RATING_COLUMN),
    )
}

/// Summary of a selected claim, including its prediction
pub fn selected_claim_summary(item: &ClaimWithPrediction) -> String {
    let likelihood = item
        .prediction
        .as_ref()
        .map(|p| p.fraud_likelihood.to_string())
        .unwrap_or_else(|| "undefined".to_string());
    let factors = item
        .prediction
        .as_ref()
        .map(|p| p.risk_factors.join(", "))
        .unwrap_or_else(|| "undefined".to_string());

    format!(
        "{} The predicted fraud likelihood is {}. Key risk factors identified are: {}.",
        claim_summary(&item.claim),
        likelihood,
        factors
    )
}

/// Summary of a whole dataset; `None` when there are no claims
pub fn dataset_summary(claims: &[Claim]) -> Option<String> {
    if claims.is_empty() {
        return None;
    }

    let amounts: Vec<f64> = claims.iter().map(Claim::amount).collect();
    let total: f64 = amounts.iter().sum();
    let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
    let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(format!(
        "Analyzed {} claims. The total value of claims is {}. Claim amounts range from {} to {}.",
        claims.len(),
        format_number(total),
        min,
        max
    ))
}
