//! Report derivation: merging claims with predictions and aggregate stats
//!
//! Everything in here is a pure function of analysis data.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{Analysis, AnalysisStatus, Claim, ClaimWithPrediction, FraudPrediction};

pub mod chart;
pub mod detail;
pub mod table;

/// Likelihood at or above which a claim counts as high-risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.75;

/// Number of most common risk factors reported across analyses
const COMMON_INDICATOR_COUNT: usize = 3;

pub fn is_high_risk(likelihood: f64) -> bool {
    likelihood >= HIGH_RISK_THRESHOLD
}

/// Join claims with predictions by claim id
///
/// Yields exactly one entry per claim, in claim order. When the model returned
/// several predictions for one id the first wins; predictions naming unknown
/// claims are dropped.
pub fn merge(claims: &[Claim], predictions: &[FraudPrediction]) -> Vec<ClaimWithPrediction> {
    let mut by_id: HashMap<&str, &FraudPrediction> = HashMap::new();
    for prediction in predictions {
        by_id.entry(prediction.claim_id.as_str()).or_insert(prediction);
    }

    claims
        .iter()
        .map(|claim| ClaimWithPrediction {
            claim: claim.clone(),
            prediction: by_id.get(claim.id.as_str()).map(|p| (*p).clone()),
        })
        .collect()
}

/// Summary cards for the active report
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SummaryStats {
    pub total_claims: usize,
    pub high_risk_claims: usize,
    pub total_claim_amount: f64,
    pub potential_fraud_amount: f64,
}

impl SummaryStats {
    pub fn from_claims(data: &[ClaimWithPrediction]) -> Self {
        let high_risk: Vec<&ClaimWithPrediction> =
            data.iter().filter(|c| is_high_risk(c.likelihood())).collect();

        Self {
            total_claims: data.len(),
            high_risk_claims: high_risk.len(),
            total_claim_amount: data.iter().map(|c| c.claim.amount()).sum(),
            potential_fraud_amount: high_risk.iter().map(|c| c.claim.amount()).sum(),
        }
    }
}

/// Aggregates over every saved, completed, non-sample analysis
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AllTimeStats {
    pub total_claims: usize,
    pub total_fraudulent: usize,
    pub total_value: f64,
    /// Most frequent risk factors, ties in first-seen order
    pub common_indicators: Vec<String>,
}

impl AllTimeStats {
    /// `None` when there is no completed analysis to aggregate
    pub fn from_analyses(analyses: &[Analysis]) -> Option<Self> {
        let completed: Vec<&Analysis> = analyses
            .iter()
            .filter(|a| a.status == AnalysisStatus::Completed && !a.is_sample)
            .collect();

        if completed.is_empty() {
            return None;
        }

        let total_claims = completed.iter().map(|a| a.claims.len()).sum();
        let total_fraudulent = completed
            .iter()
            .flat_map(|a| a.predictions.iter())
            .filter(|p| is_high_risk(p.fraud_likelihood))
            .count();
        let total_value = completed
            .iter()
            .flat_map(|a| a.claims.iter())
            .map(Claim::amount)
            .sum();

        let factors = completed
            .iter()
            .flat_map(|a| a.predictions.iter())
            .flat_map(|p| p.risk_factors.iter().map(String::as_str));

        Some(Self {
            total_claims,
            total_fraudulent,
            total_value,
            common_indicators: top_by_count(factors, COMMON_INDICATOR_COUNT),
        })
    }
}

/// The `n` most frequent items; equal counts keep first-encountered order
fn top_by_count<'a>(items: impl Iterator<Item = &'a str>, n: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match index.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(item, _)| item.to_string())
        .collect()
}

/// Card shown for each saved analysis in the initial view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentAnalysisCard {
    pub id: String,
    pub file_name: String,
    pub date: DateTime<Utc>,
    pub status: AnalysisStatus,
    pub total_claims: usize,
    pub high_risk_claims: usize,
    pub can_view_report: bool,
}

impl From<&Analysis> for RecentAnalysisCard {
    fn from(analysis: &Analysis) -> Self {
        Self {
            id: analysis.id.clone(),
            file_name: analysis.file_name.clone(),
            date: analysis.date,
            status: analysis.status,
            total_claims: analysis.claims.len(),
            high_risk_claims: analysis
                .predictions
                .iter()
                .filter(|p| is_high_risk(p.fraud_likelihood))
                .count(),
            can_view_report: analysis.is_completed(),
        }
    }
}

/// Format an amount as US dollars, e.g. `$1,234.50`
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    format!(
        "{}${}.{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

/// Format a number with thousands separators and at most three decimals
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let scaled = (value.abs() * 1000.0).round() as u64;
    let whole = group_thousands(scaled / 1000);
    let fraction = scaled % 1000;

    if fraction == 0 {
        format!("{}{}", sign, whole)
    } else {
        let digits = format!("{:03}", fraction);
        format!("{}{}.{}", sign, whole, digits.trim_end_matches('0'))
    }
}

/// Likelihood as a percentage with one decimal, e.g. `85.0%`
pub fn format_percent(likelihood: f64) -> String {
    format!("{:.1}%", likelihood * 100.0)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
