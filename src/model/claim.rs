use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Column holding the source claim identifier
pub const CLAIM_ID_COLUMN: &str = "claim_id";

/// Column holding the total claim amount
pub const CLAIM_AMOUNT_COLUMN: &str = "total_claim_amount";

pub const INCIDENT_TYPE_COLUMN: &str = "incident_type";

pub const DRIVER_RATING_COLUMN: &str = "driver_rating";

/// A single cell of uploaded claim data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ClaimValue {
    Number(f64),
    Text(String),
}

impl ClaimValue {
    /// Numeric interpretation of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ClaimValue::Number(n) => Some(*n),
            ClaimValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for ClaimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimValue::Number(n) => write!(f, "{}", n),
            ClaimValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClaimField {
    pub name: String,
    pub value: ClaimValue,
}

/// One row of uploaded insurance-claim data
///
/// Fields keep the column order of the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Claim {
    pub id: String,
    pub fields: Vec<ClaimField>,
}

impl Claim {
    pub fn get(&self, column: &str) -> Option<&ClaimValue> {
        self.fields
            .iter()
            .find(|f| f.name == column)
            .map(|f| &f.value)
    }

    /// Claimed amount; missing or non-numeric values count as zero
    pub fn amount(&self) -> f64 {
        self.get(CLAIM_AMOUNT_COLUMN)
            .and_then(ClaimValue::as_f64)
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    }

    /// Display value of a column, `undefined` when the column is absent
    pub fn display(&self, column: &str) -> String {
        self.get(column)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "undefined".to_string())
    }
}

/// Model output for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FraudPrediction {
    pub claim_id: String,
    pub fraud_likelihood: f64,
    pub risk_factors: Vec<String>,
}

/// A claim joined with its prediction, if the model produced one
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClaimWithPrediction {
    pub claim: Claim,
    pub prediction: Option<FraudPrediction>,
}

impl ClaimWithPrediction {
    /// Predicted likelihood, zero when no prediction matched
    pub fn likelihood(&self) -> f64 {
        self.prediction
            .as_ref()
            .map(|p| p.fraud_likelihood)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskCategory {
    pub fn from_likelihood(likelihood: f64) -> Self {
        if likelihood > 0.9 {
            RiskCategory::Critical
        } else if likelihood > 0.7 {
            RiskCategory::High
        } else if likelihood > 0.4 {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }

    pub fn recommendation(self) -> Recommendation {
        match self {
            RiskCategory::Critical | RiskCategory::High => Recommendation::ManualReview,
            RiskCategory::Medium => Recommendation::Monitor,
            RiskCategory::Low => Recommendation::AutoApprove,
        }
    }
}

impl std::str::FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(RiskCategory::Low),
            "medium" => Ok(RiskCategory::Medium),
            "high" => Ok(RiskCategory::High),
            "critical" => Ok(RiskCategory::Critical),
            other => Err(format!("unknown risk category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Recommendation {
    #[serde(rename = "Manual Review")]
    ManualReview,
    Monitor,
    #[serde(rename = "Auto-Approve")]
    AutoApprove,
}
