//! Claims table: filtering, sorting and row rendering

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{format_currency, format_percent};
use crate::model::{ClaimValue, ClaimWithPrediction, Recommendation, RiskCategory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// Predicted fraud likelihood (missing prediction sorts as 0)
    Likelihood,
    Id,
    /// Any uploaded column
    Column(String),
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        match s {
            "fraudLikelihood" | "fraud_likelihood" | "likelihood" => SortKey::Likelihood,
            "id" => SortKey::Id,
            other => SortKey::Column(other.to_string()),
        }
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortKey::from(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Table state: text filter, risk filter and sort order
#[derive(Debug, Clone)]
pub struct ClaimsTableQuery {
    /// Case-insensitive substring of the claim id
    pub filter: Option<String>,
    /// `None` shows every risk level
    pub risk: Option<RiskCategory>,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl Default for ClaimsTableQuery {
    fn default() -> Self {
        Self {
            filter: None,
            risk: None,
            sort: SortKey::Likelihood,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClaimRow {
    pub id: String,
    pub claim_amount: f64,
    pub claim_amount_display: String,
    pub likelihood: f64,
    pub likelihood_display: String,
    pub risk_category: RiskCategory,
    pub recommendation: Recommendation,
}

impl From<&ClaimWithPrediction> for ClaimRow {
    fn from(item: &ClaimWithPrediction) -> Self {
        let likelihood = item.likelihood();
        let category = RiskCategory::from_likelihood(likelihood);
        let amount = item.claim.amount();

        Self {
            id: item.claim.id.clone(),
            claim_amount: amount,
            claim_amount_display: format_currency(amount),
            likelihood,
            likelihood_display: format_percent(likelihood),
            risk_category: category,
            recommendation: category.recommendation(),
        }
    }
}

/// Apply filters and sort, then render rows
pub fn claims_table(data: &[ClaimWithPrediction], query: &ClaimsTableQuery) -> Vec<ClaimRow> {
    let needle = query
        .filter
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase);

    let mut rows: Vec<&ClaimWithPrediction> = data
        .iter()
        .filter(|item| match &needle {
            Some(n) => item.claim.id.to_lowercase().contains(n),
            None => true,
        })
        .filter(|item| match query.risk {
            Some(risk) => RiskCategory::from_likelihood(item.likelihood()) == risk,
            None => true,
        })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = compare_by(a, b, &query.sort);
        match query.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    rows.into_iter().map(ClaimRow::from).collect()
}

fn compare_by(a: &ClaimWithPrediction, b: &ClaimWithPrediction, key: &SortKey) -> Ordering {
    match key {
        SortKey::Likelihood => a
            .likelihood()
            .partial_cmp(&b.likelihood())
            .unwrap_or(Ordering::Equal),
        SortKey::Id => compare_text(&a.claim.id, &b.claim.id),
        SortKey::Column(column) => compare_values(a.claim.get(column), b.claim.get(column)),
    }
}

/// Numeric when both sides are numbers, otherwise lexicographic
fn compare_values(a: Option<&ClaimValue>, b: Option<&ClaimValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.to_string().cmp(&b.to_string()),
        },
        // Missing values sort first
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}
