//! CSV parser adapter
//!
//! Turns uploaded claim files into ordered `Claim` rows using the `csv` crate.

use std::collections::HashSet;

use csv::{ReaderBuilder, StringRecord};
use uuid::Uuid;

use crate::model::{CLAIM_ID_COLUMN, Claim, ClaimField, ClaimValue};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("CSV input has no header row")]
    MissingHeader,

    #[error("Line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: duplicate claim id '{id}'")]
    DuplicateClaimId { line: u64, id: String },

    #[error("Malformed CSV: {0}")]
    Malformed(String),
}

/// Result of parsing an upload: every row that parsed, plus every error seen
#[derive(Debug, Default)]
pub struct ParsedClaims {
    pub claims: Vec<Claim>,
    pub errors: Vec<ParseError>,
}

impl ParsedClaims {
    /// All claims, or the first error if any row failed
    pub fn into_result(self) -> Result<Vec<Claim>, ParseError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.claims),
        }
    }
}

/// Parse CSV text with a header row into claims
///
/// Empty lines are skipped. A row of separators only (`,,`) is still a
/// claim with empty values. Each claim gets the `claim_id` column as its id
/// when present and non-empty, otherwise a random UUID.
pub fn parse(text: &str) -> ParsedClaims {
    let mut parsed = ParsedClaims::default();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|name| name.trim().to_string()).collect(),
        Err(e) => {
            parsed.errors.push(ParseError::Malformed(e.to_string()));
            return parsed;
        }
    };

    if headers.iter().all(|h| h.is_empty()) {
        parsed.errors.push(ParseError::MissingHeader);
        return parsed;
    }

    let mut seen_ids = HashSet::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                parsed.errors.push(ParseError::Malformed(e.to_string()));
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != headers.len() {
            parsed.errors.push(ParseError::FieldCount {
                line,
                expected: headers.len(),
                found: record.len(),
            });
            continue;
        }

        let claim = build_claim(&headers, &record);

        if !seen_ids.insert(claim.id.clone()) {
            parsed.errors.push(ParseError::DuplicateClaimId {
                line,
                id: claim.id,
            });
            continue;
        }

        parsed.claims.push(claim);
    }

    tracing::debug!(
        claims = parsed.claims.len(),
        errors = parsed.errors.len(),
        "Parsed claim CSV"
    );

    parsed
}

fn build_claim(headers: &[String], record: &StringRecord) -> Claim {
    let fields: Vec<ClaimField> = headers
        .iter()
        .zip(record.iter())
        .map(|(name, value)| ClaimField {
            name: name.clone(),
            value: ClaimValue::Text(value.to_string()),
        })
        .collect();

    let id = fields
        .iter()
        .find(|f| f.name == CLAIM_ID_COLUMN)
        .map(|f| f.value.to_string().trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Claim { id, fields }
}
