//! Risk distribution chart data

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::ClaimWithPrediction;

const BIN_COUNT: usize = 10;

/// One likelihood decile of the risk distribution
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RiskBin {
    /// Label such as `40-50%`
    pub name: String,
    pub claims: usize,
    /// Summed claim amount in this bin
    pub value: f64,
}

/// Bin claims by likelihood decile; 1.0 lands in the last bin
pub fn risk_distribution(data: &[ClaimWithPrediction]) -> Vec<RiskBin> {
    let mut bins: Vec<RiskBin> = (0..BIN_COUNT)
        .map(|i| RiskBin {
            name: format!("{}-{}%", i * 10, (i + 1) * 10),
            claims: 0,
            value: 0.0,
        })
        .collect();

    for item in data {
        let bin = &mut bins[bin_index(item.likelihood())];
        bin.claims += 1;
        bin.value += item.claim.amount();
    }

    bins
}

fn bin_index(likelihood: f64) -> usize {
    if !likelihood.is_finite() || likelihood <= 0.0 {
        return 0;
    }
    ((likelihood * BIN_COUNT as f64).floor() as usize).min(BIN_COUNT - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Claim, ClaimField, ClaimValue, FraudPrediction};

    fn item(likelihood: Option<f64>, amount: &str) -> ClaimWithPrediction {
        ClaimWithPrediction {
            claim: Claim {
                id: "x".to_string(),
                fields: vec![ClaimField {
                    name: "total_claim_amount".to_string(),
                    value: ClaimValue::Text(amount.to_string()),
                }],
            },
            prediction: likelihood.map(|l| FraudPrediction {
                claim_id: "x".to_string(),
                fraud_likelihood: l,
                risk_factors: vec![],
            }),
        }
    }

    #[test]
    fn test_bin_labels() {
        let bins = risk_distribution(&[]);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].name, "0-10%");
        assert_eq!(bins[9].name, "90-100%");
        assert!(bins.iter().all(|b| b.claims == 0));
    }

    #[test]
    fn test_edges() {
        let bins = risk_distribution(&[
            item(Some(0.0), "100"),
            item(Some(1.0), "200"),
            item(Some(0.45), "300"),
            item(None, "400"),
            item(Some(0.99), "500"),
        ]);
        assert_eq!(bins[0].claims, 2);
        assert_eq!(bins[0].value, 500.0);
        assert_eq!(bins[4].claims, 1);
        assert_eq!(bins[9].claims, 2);
        assert_eq!(bins[9].value, 700.0);
    }
}
