//! REST API endpoints for the dashboard view

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error::ApiError;
use crate::service::DashboardController;
use crate::service::dashboard::DashboardSnapshot;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardParams {
    /// Start a demo run on the sample dataset when the dashboard is idle
    #[serde(default)]
    pub demo: bool,
}

/// Get the current dashboard view
#[utoipa::path(
    get,
    path = "/v1/dashboard",
    params(DashboardParams),
    responses(
        (status = 200, description = "Current view", body = DashboardSnapshot),
    ),
    tag = "dashboard"
)]
#[get("/v1/dashboard")]
pub async fn get_dashboard(
    controller: web::Data<DashboardController>,
    query: web::Query<DashboardParams>,
) -> Result<HttpResponse, ApiError> {
    let snapshot = if query.demo {
        controller.into_inner().demo_on_load().await?
    } else {
        controller.snapshot().await
    };

    Ok(HttpResponse::Ok().json(snapshot))
}

/// Open the upload form
#[utoipa::path(
    post,
    path = "/v1/dashboard/new-analysis",
    responses(
        (status = 200, description = "Upload view", body = DashboardSnapshot),
        (status = 409, description = "Not allowed from the current view", body = crate::api::error::ErrorResponse)
    ),
    tag = "dashboard"
)]
#[post("/v1/dashboard/new-analysis")]
pub async fn new_analysis(
    controller: web::Data<DashboardController>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(controller.new_analysis().await?))
}

/// Go back to the list of saved analyses
#[utoipa::path(
    post,
    path = "/v1/dashboard/show-analyses",
    responses(
        (status = 200, description = "Initial view", body = DashboardSnapshot),
        (status = 409, description = "Not allowed from the current view", body = crate::api::error::ErrorResponse)
    ),
    tag = "dashboard"
)]
#[post("/v1/dashboard/show-analyses")]
pub async fn show_analyses(
    controller: web::Data<DashboardController>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(controller.show_analyses().await?))
}

/// Leave the error view
#[utoipa::path(
    post,
    path = "/v1/dashboard/try-again",
    responses(
        (status = 200, description = "Initial view", body = DashboardSnapshot),
        (status = 409, description = "Not in the error view", body = crate::api::error::ErrorResponse)
    ),
    tag = "dashboard"
)]
#[post("/v1/dashboard/try-again")]
pub async fn try_again(
    controller: web::Data<DashboardController>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(controller.try_again().await?))
}

/// Configure dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_dashboard)
        .service(new_analysis)
        .service(show_analyses)
        .service(try_again);
}
