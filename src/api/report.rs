//! REST API endpoints for the open report

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::RiskCategory;
use crate::service::DashboardController;
use crate::service::report::chart::RiskBin;
use crate::service::report::detail::{ClaimDetail, RiskFactorsPanel};
use crate::service::report::table::{ClaimRow, ClaimsTableQuery, SortDirection, SortKey};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClaimsTableParams {
    /// Case-insensitive substring of the claim ID
    pub filter: Option<String>,
    /// `all` (default), `low`, `medium`, `high` or `critical`
    pub risk: Option<String>,
    /// `fraudLikelihood` (default), `id` or any column name
    pub sort: Option<String>,
    /// `asc` or `desc` (default)
    pub direction: Option<SortDirection>,
}

impl ClaimsTableParams {
    fn into_query(self) -> Result<ClaimsTableQuery, ApiError> {
        let risk = match self.risk.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(r.parse::<RiskCategory>().map_err(ApiError::BadRequest)?),
        };

        let defaults = ClaimsTableQuery::default();
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => defaults.sort,
            Some(s) => SortKey::from(s),
        };

        Ok(ClaimsTableQuery {
            filter: self.filter,
            risk,
            sort,
            direction: self.direction.unwrap_or(defaults.direction),
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RiskFactorsParams {
    /// Explain a single claim instead of the whole dataset
    pub claim_id: Option<String>,
}

/// Claims table of the open report
#[utoipa::path(
    get,
    path = "/v1/report/claims",
    params(ClaimsTableParams),
    responses(
        (status = 200, description = "Filtered and sorted rows", body = Vec<ClaimRow>),
        (status = 400, description = "Unknown risk filter", body = ErrorResponse),
        (status = 409, description = "No report is open", body = ErrorResponse)
    ),
    tag = "report"
)]
#[get("/v1/report/claims")]
pub async fn list_claims(
    controller: web::Data<DashboardController>,
    query: web::Query<ClaimsTableParams>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner().into_query()?;
    Ok(HttpResponse::Ok().json(controller.claims_table(&query).await?))
}

/// Risk distribution chart of the open report
#[utoipa::path(
    get,
    path = "/v1/report/distribution",
    responses(
        (status = 200, description = "Ten likelihood bins", body = Vec<RiskBin>),
        (status = 409, description = "No report is open", body = ErrorResponse)
    ),
    tag = "report"
)]
#[get("/v1/report/distribution")]
pub async fn distribution(
    controller: web::Data<DashboardController>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(controller.risk_distribution().await?))
}

/// Detail panel for one claim, including a model explanation
#[utoipa::path(
    get,
    path = "/v1/report/claims/{claim_id}",
    params(
        ("claim_id" = String, Path, description = "Claim ID")
    ),
    responses(
        (status = 200, description = "Claim detail", body = ClaimDetail),
        (status = 404, description = "Claim not in the open report", body = ErrorResponse),
        (status = 409, description = "No report is open", body = ErrorResponse)
    ),
    tag = "report"
)]
#[get("/v1/report/claims/{claim_id}")]
pub async fn claim_detail(
    controller: web::Data<DashboardController>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let claim_id = path.into_inner();
    Ok(HttpResponse::Ok().json(controller.claim_detail(&claim_id).await?))
}

/// Key risk factors for a selected claim or the whole dataset
#[utoipa::path(
    get,
    path = "/v1/report/risk-factors",
    params(RiskFactorsParams),
    responses(
        (status = 200, description = "Risk factors panel", body = RiskFactorsPanel),
        (status = 404, description = "Claim not in the open report", body = ErrorResponse),
        (status = 409, description = "No report is open", body = ErrorResponse)
    ),
    tag = "report"
)]
#[get("/v1/report/risk-factors")]
pub async fn risk_factors(
    controller: web::Data<DashboardController>,
    query: web::Query<RiskFactorsParams>,
) -> Result<HttpResponse, ApiError> {
    let claim_id = query.claim_id.as_deref().filter(|id| !id.is_empty());
    Ok(HttpResponse::Ok().json(controller.risk_factors_panel(claim_id).await?))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_claims)
        .service(distribution)
        .service(claim_detail)
        .service(risk_factors);
}
