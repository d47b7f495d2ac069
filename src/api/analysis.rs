//! REST API endpoints for running and managing analyses

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::sample::{SAMPLE_CLAIMS_CSV, TEMPLATE_FILE_NAME};
use crate::service::DashboardController;
use crate::service::dashboard::{AnalysesOverview, DashboardSnapshot};

#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadParams {
    /// Name of the uploaded file, recorded on the analysis
    pub file_name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SampleParams {
    /// Mark the run as a demo
    #[serde(default)]
    pub demo: bool,
}

/// Upload a CSV file of claims and run the analysis
///
/// Waits for the run to finish; the response is the resulting view, which is
/// either the report or the error view.
#[utoipa::path(
    post,
    path = "/v1/analyses",
    params(UploadParams),
    request_body(content = String, content_type = "text/csv", description = "Claim data with a header row"),
    responses(
        (status = 200, description = "Run finished", body = DashboardSnapshot),
        (status = 409, description = "A run is already in progress", body = ErrorResponse)
    ),
    tag = "analyses"
)]
#[post("/v1/analyses")]
pub async fn upload_analysis(
    controller: web::Data<DashboardController>,
    query: web::Query<UploadParams>,
    body: String,
) -> Result<HttpResponse, ApiError> {
    let file_name = query.file_name.trim();
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("file_name must not be empty".to_string()));
    }

    tracing::info!(file_name = %file_name, bytes = body.len(), "Received claim upload");

    let snapshot = controller.into_inner().upload(file_name, body).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// Run the analysis on the built-in sample dataset
#[utoipa::path(
    post,
    path = "/v1/analyses/sample",
    params(SampleParams),
    responses(
        (status = 200, description = "Run finished", body = DashboardSnapshot),
        (status = 409, description = "A run is already in progress", body = ErrorResponse)
    ),
    tag = "analyses"
)]
#[post("/v1/analyses/sample")]
pub async fn sample_analysis(
    controller: web::Data<DashboardController>,
    query: web::Query<SampleParams>,
) -> Result<HttpResponse, ApiError> {
    let snapshot = controller.into_inner().use_sample_data(query.demo).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// List saved analyses with all-time statistics
#[utoipa::path(
    get,
    path = "/v1/analyses",
    responses(
        (status = 200, description = "Saved analyses, newest first", body = AnalysesOverview)
    ),
    tag = "analyses"
)]
#[get("/v1/analyses")]
pub async fn list_analyses(controller: web::Data<DashboardController>) -> HttpResponse {
    HttpResponse::Ok().json(controller.overview().await)
}

/// Open the report of a saved analysis
#[utoipa::path(
    post,
    path = "/v1/analyses/{id}/view",
    params(
        ("id" = String, Path, description = "Analysis ID")
    ),
    responses(
        (status = 200, description = "Report opened", body = DashboardSnapshot),
        (status = 404, description = "Analysis not found", body = ErrorResponse),
        (status = 409, description = "Analysis has no report or the view does not allow it", body = ErrorResponse)
    ),
    tag = "analyses"
)]
#[post("/v1/analyses/{id}/view")]
pub async fn view_analysis(
    controller: web::Data<DashboardController>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    Ok(HttpResponse::Ok().json(controller.view_analysis(&id).await?))
}

/// Delete a saved analysis
#[utoipa::path(
    delete,
    path = "/v1/analyses/{id}",
    params(
        ("id" = String, Path, description = "Analysis ID")
    ),
    responses(
        (status = 204, description = "Analysis deleted"),
        (status = 404, description = "Analysis not found", body = ErrorResponse)
    ),
    tag = "analyses"
)]
#[delete("/v1/analyses/{id}")]
pub async fn delete_analysis(
    controller: web::Data<DashboardController>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    controller.delete_analysis(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Download the CSV template
#[utoipa::path(
    get,
    path = "/v1/template.csv",
    responses(
        (status = 200, description = "Template with sample rows", content_type = "text/csv", body = String)
    ),
    tag = "analyses"
)]
#[get("/v1/template.csv")]
pub async fn download_template() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(TEMPLATE_FILE_NAME.to_string())],
        })
        .body(SAMPLE_CLAIMS_CSV)
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(upload_analysis)
        .service(sample_analysis)
        .service(list_analyses)
        .service(view_analysis)
        .service(delete_analysis)
        .service(download_template);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};
    use serde_json::Value;

    use super::*;
    use crate::api::test_support::{controller, sample_predictions};
    use crate::service::prediction::testing::FakeFraudModel;

    #[actix_web::test]
    async fn test_upload_then_list_view_and_delete() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(
                    controller(FakeFraudModel::scoring(sample_predictions())).await,
                ))
                .configure(configure)
                .configure(crate::api::dashboard::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/analyses?file_name=claims.csv")
            .set_payload(SAMPLE_CLAIMS_CSV)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["view"], "dashboard");
        assert_eq!(body["summary"]["total_claims"], 12);

        let req = test::TestRequest::get().uri("/v1/analyses").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["analyses"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["all_time"]["total_claims"], 12);
        let id = body["analyses"][0]["id"].as_str().unwrap().to_string();

        // Opening a report is only possible from the initial view
        let req = test::TestRequest::post()
            .uri(&format!("/v1/analyses/{}/view", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);

        let req = test::TestRequest::post()
            .uri("/v1/dashboard/show-analyses")
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/v1/analyses/{}/view", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["analysis_id"], id.as_str());

        let req = test::TestRequest::delete()
            .uri(&format!("/v1/analyses/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 204);

        let req = test::TestRequest::delete()
            .uri(&format!("/v1/analyses/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn test_malformed_upload_lands_in_error_view() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(
                    controller(FakeFraudModel::scoring(sample_predictions())).await,
                ))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/analyses?file_name=bad.csv")
            .set_payload("claim_id,total_claim_amount\n1,2,3\n")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["view"], "error");
        assert_eq!(
            body["message"],
            "Error parsing CSV file. Please check the format."
        );

        // Stuck in the error view until the user retries
        let req = test::TestRequest::post()
            .uri("/v1/analyses/sample")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);
    }

    #[actix_web::test]
    async fn test_template_download() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::get().uri("/v1/template.csv").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let disposition = resp
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("claim_template.csv"));

        let body = test::read_body(resp).await;
        assert_eq!(body, SAMPLE_CLAIMS_CSV.as_bytes());
    }
}
