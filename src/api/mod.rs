pub mod analysis;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod openapi;
pub mod report;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ClaimGuard API",
        description = "Insurance claim fraud triage backed by an LLM"
    ),
    paths(
        dashboard::get_dashboard,
        dashboard::new_analysis,
        dashboard::show_analyses,
        dashboard::try_again,
        analysis::upload_analysis,
        analysis::sample_analysis,
        analysis::list_analyses,
        analysis::view_analysis,
        analysis::delete_analysis,
        analysis::download_template,
        report::list_claims,
        report::distribution,
        report::claim_detail,
        report::risk_factors,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        crate::service::dashboard::DashboardSnapshot,
        crate::service::dashboard::AnalysesOverview,
        crate::service::dashboard::LoadingStep,
        crate::service::report::SummaryStats,
        crate::service::report::AllTimeStats,
        crate::service::report::RecentAnalysisCard,
        crate::service::report::table::ClaimRow,
        crate::service::report::table::SortDirection,
        crate::service::report::chart::RiskBin,
        crate::service::report::detail::ClaimDetail,
        crate::service::report::detail::DetailItem,
        crate::service::report::detail::RiskFactorsPanel,
        crate::model::RiskCategory,
        crate::model::Recommendation,
        crate::model::AnalysisStatus,
        error::ErrorResponse,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
    )),
    tags(
        (name = "dashboard", description = "Dashboard view state"),
        (name = "analyses", description = "Running and managing analyses"),
        (name = "report", description = "Views of the open report"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
pub mod test_support {
    use std::sync::Arc;

    use crate::model::{FraudPrediction, PacingConfig};
    use crate::service::prediction::testing::{FakeFraudModel, prediction};
    use crate::service::{AnalysisStore, DashboardController, InMemoryAnalysisStorage};

    pub async fn controller(model: FakeFraudModel) -> Arc<DashboardController> {
        let store = AnalysisStore::open(Box::new(InMemoryAnalysisStorage::new())).await;
        Arc::new(DashboardController::new(
            Arc::new(model),
            store,
            PacingConfig::immediate(),
        ))
    }

    /// One prediction per sample claim
    pub fn sample_predictions() -> Vec<FraudPrediction> {
        [0.85, 0.3, 0.05, 0.8, 0.99, 0.5, 0.1, 0.72, 0.45, 0.2, 0.6, 0.91]
            .iter()
            .enumerate()
            .map(|(i, l)| prediction(&(i + 1).to_string(), *l, &["High amount"]))
            .collect()
    }
}
