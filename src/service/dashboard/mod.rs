//! Dashboard controller
//!
//! Owns the view-state machine and drives a run end to end: parse the upload,
//! record the analysis, score it with the fraud model and open the report.
//! All report view models are derived from the open report on demand.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::model::sample::{DEMO_FILE_NAME, SAMPLE_CLAIMS_CSV, SAMPLE_FILE_NAME};
use crate::model::{Analysis, AnalysisStatus, Claim, FraudPrediction, PacingConfig};
use crate::service::parser;
use crate::service::prediction::FraudModel;
use crate::service::prediction::prompts::MODEL_PARAMETERS;
use crate::service::report::chart::{RiskBin, risk_distribution};
use crate::service::report::detail::{
    ClaimDetail, DETAIL_EXPLANATION_FALLBACK, PANEL_EXPLANATION_FALLBACK, PANEL_PLACEHOLDER,
    RiskFactorsPanel, claim_summary, dataset_summary, selected_claim_summary,
};
use crate::service::report::table::{ClaimRow, ClaimsTableQuery, claims_table};
use crate::service::report::{AllTimeStats, RecentAnalysisCard, SummaryStats};
use crate::service::store::AnalysisStore;

pub mod error;
pub mod view;

pub use error::DashboardError;
pub use view::{ActiveReport, DashboardEvent, DashboardView, LoadingStep, transition};

/// Shown when the upload could not be parsed
pub const PARSE_ERROR_MESSAGE: &str = "Error parsing CSV file. Please check the format.";

/// Shown when the fraud model call failed
pub const PREDICTION_ERROR_MESSAGE: &str = "Failed to get fraud predictions.";

/// Saved analyses plus aggregates, as shown in the initial view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysesOverview {
    pub analyses: Vec<RecentAnalysisCard>,
    pub all_time: Option<AllTimeStats>,
}

/// Serializable picture of the current view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardSnapshot {
    Initial {
        analyses: Vec<RecentAnalysisCard>,
        all_time: Option<AllTimeStats>,
    },
    Upload {
        template_file_name: String,
    },
    Loading {
        file_name: String,
        step: LoadingStep,
    },
    Dashboard {
        analysis_id: String,
        file_name: String,
        is_demo: bool,
        summary: SummaryStats,
    },
    Error {
        message: String,
    },
}

struct RunInput {
    file_name: String,
    csv: String,
    is_sample: bool,
    is_demo: bool,
}

pub struct DashboardController {
    model: Arc<dyn FraudModel>,
    store: Mutex<AnalysisStore>,
    view: Mutex<DashboardView>,
    pacing: PacingConfig,
}

impl DashboardController {
    pub fn new(model: Arc<dyn FraudModel>, store: AnalysisStore, pacing: PacingConfig) -> Self {
        Self {
            model,
            store: Mutex::new(store),
            view: Mutex::new(DashboardView::Initial),
            pacing,
        }
    }

    /// Apply an event to the current view
    async fn dispatch(&self, event: DashboardEvent) -> Result<(), DashboardError> {
        let mut view = self.view.lock().await;
        let next = transition(&view, event)?;

        tracing::debug!(from = view.name(), to = next.name(), "Dashboard transition");
        *view = next;
        Ok(())
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let view = self.view.lock().await.clone();

        match view {
            DashboardView::Initial => {
                let overview = self.overview().await;
                DashboardSnapshot::Initial {
                    analyses: overview.analyses,
                    all_time: overview.all_time,
                }
            }
            DashboardView::Upload => DashboardSnapshot::Upload {
                template_file_name: crate::model::sample::TEMPLATE_FILE_NAME.to_string(),
            },
            DashboardView::Loading { file_name, step } => {
                DashboardSnapshot::Loading { file_name, step }
            }
            DashboardView::Dashboard(report) => DashboardSnapshot::Dashboard {
                summary: report.summary(),
                analysis_id: report.analysis_id,
                file_name: report.file_name,
                is_demo: report.is_demo,
            },
            DashboardView::Error { message } => DashboardSnapshot::Error { message },
        }
    }

    /// Saved analysis cards and all-time aggregates
    pub async fn overview(&self) -> AnalysesOverview {
        let store = self.store.lock().await;
        let saved: Vec<Analysis> = store
            .list()
            .iter()
            .filter(|a| !a.is_sample)
            .cloned()
            .collect();

        AnalysesOverview {
            analyses: saved.iter().map(RecentAnalysisCard::from).collect(),
            all_time: AllTimeStats::from_analyses(&saved),
        }
    }

    pub async fn new_analysis(&self) -> Result<DashboardSnapshot, DashboardError> {
        self.dispatch(DashboardEvent::NewAnalysis).await?;
        Ok(self.snapshot().await)
    }

    pub async fn show_analyses(&self) -> Result<DashboardSnapshot, DashboardError> {
        self.dispatch(DashboardEvent::ShowAnalyses).await?;
        Ok(self.snapshot().await)
    }

    pub async fn try_again(&self) -> Result<DashboardSnapshot, DashboardError> {
        self.dispatch(DashboardEvent::TryAgain).await?;
        Ok(self.snapshot().await)
    }

    /// Run the pipeline on an uploaded CSV file and wait for it to finish
    pub async fn upload(
        self: &Arc<Self>,
        file_name: &str,
        csv: String,
    ) -> Result<DashboardSnapshot, DashboardError> {
        self.run_to_completion(RunInput {
            file_name: file_name.to_string(),
            csv,
            is_sample: false,
            is_demo: false,
        })
        .await
    }

    /// Run the pipeline on the built-in sample dataset and wait for it to finish
    pub async fn use_sample_data(
        self: &Arc<Self>,
        demo: bool,
    ) -> Result<DashboardSnapshot, DashboardError> {
        self.run_to_completion(Self::sample_input(demo)).await
    }

    /// Start a demo run in the background when the dashboard is idle
    ///
    /// Returns the view right after the decision, so a triggered run shows
    /// up as loading.
    pub async fn demo_on_load(self: &Arc<Self>) -> Result<DashboardSnapshot, DashboardError> {
        let input = Self::sample_input(true);

        let idle = {
            let mut view = self.view.lock().await;
            let idle = matches!(*view, DashboardView::Initial);
            if idle {
                *view = transition(
                    &view,
                    DashboardEvent::StartRun {
                        file_name: input.file_name.clone(),
                    },
                )?;
            }
            idle
        };

        if idle {
            tracing::info!("Starting demo run on load");
            let controller = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = controller.execute(input).await {
                    tracing::error!(error = %e, "Demo run aborted");
                }
            });
        }

        Ok(self.snapshot().await)
    }

    fn sample_input(demo: bool) -> RunInput {
        RunInput {
            file_name: if demo { DEMO_FILE_NAME } else { SAMPLE_FILE_NAME }.to_string(),
            csv: SAMPLE_CLAIMS_CSV.to_string(),
            is_sample: true,
            is_demo: demo,
        }
    }

    /// Enter `Loading`, then run the pipeline on its own task
    ///
    /// The task keeps running if the caller goes away, so a started run
    /// always lands in `Dashboard` or `Error`.
    async fn run_to_completion(
        self: &Arc<Self>,
        input: RunInput,
    ) -> Result<DashboardSnapshot, DashboardError> {
        self.dispatch(DashboardEvent::StartRun {
            file_name: input.file_name.clone(),
        })
        .await?;

        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.execute(input).await })
            .await
            .map_err(|e| DashboardError::RunAborted(e.to_string()))??;

        Ok(self.snapshot().await)
    }

    /// The pipeline proper; the view is already `Loading`
    ///
    /// Scoring runs on a task of its own. If it dies, the analysis is marked
    /// failed and the view moves to `Error` instead of staying in `Loading`.
    async fn execute(self: Arc<Self>, input: RunInput) -> Result<(), DashboardError> {
        let claims = match parser::parse(&input.csv).into_result() {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(file_name = %input.file_name, error = %e, "Failed to parse upload");
                return self
                    .dispatch(DashboardEvent::RunFailed {
                        message: PARSE_ERROR_MESSAGE.to_string(),
                    })
                    .await;
            }
        };

        let analysis = Analysis::processing(&input.file_name, claims, input.is_sample);
        tracing::info!(
            analysis_id = %analysis.id,
            file_name = %analysis.file_name,
            claims = analysis.claims.len(),
            is_sample = analysis.is_sample,
            "Analysis started"
        );
        self.record(&analysis).await;

        let controller = Arc::clone(&self);
        let running = analysis.clone();
        let scoring =
            tokio::spawn(async move { controller.score(running, input.csv, input.is_demo).await });

        match scoring.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(analysis_id = %analysis.id, error = %e, "Analysis run aborted");
                self.finish(&analysis.failed()).await;

                self.dispatch(DashboardEvent::RunFailed {
                    message: PREDICTION_ERROR_MESSAGE.to_string(),
                })
                .await
            }
        }
    }

    async fn score(
        &self,
        analysis: Analysis,
        csv: String,
        is_demo: bool,
    ) -> Result<(), DashboardError> {
        tokio::time::sleep(self.pacing.uploading()).await;
        self.dispatch(DashboardEvent::StepAdvanced(LoadingStep::Analyzing))
            .await?;
        tokio::time::sleep(self.pacing.analyzing()).await;
        self.dispatch(DashboardEvent::StepAdvanced(LoadingStep::Predicting))
            .await?;

        match self.model.predict(&csv).await {
            Ok(predictions) => {
                log_unmatched(&analysis.id, &analysis.claims, &predictions);

                let analysis = analysis.completed(predictions);
                tracing::info!(
                    analysis_id = %analysis.id,
                    predictions = analysis.predictions.len(),
                    "Analysis completed"
                );
                self.finish(&analysis).await;

                self.dispatch(DashboardEvent::StepAdvanced(LoadingStep::Done))
                    .await?;
                tokio::time::sleep(self.pacing.finishing()).await;

                let report = ActiveReport::new(&analysis, is_demo);
                self.dispatch(DashboardEvent::RunSucceeded(Box::new(report)))
                    .await
            }
            Err(e) => {
                tracing::error!(analysis_id = %analysis.id, error = %e, "Fraud prediction failed");
                self.finish(&analysis.failed()).await;

                self.dispatch(DashboardEvent::RunFailed {
                    message: PREDICTION_ERROR_MESSAGE.to_string(),
                })
                .await
            }
        }
    }

    /// Persist an analysis unless it is a sample run
    async fn record(&self, analysis: &Analysis) {
        if analysis.is_sample {
            return;
        }
        self.store.lock().await.upsert(analysis.clone()).await;
    }

    /// Persist the outcome of a run, unless its analysis was deleted meanwhile
    async fn finish(&self, analysis: &Analysis) {
        if analysis.is_sample {
            return;
        }

        let mut store = self.store.lock().await;
        if store.get(&analysis.id).is_none() {
            tracing::info!(analysis_id = %analysis.id, "Analysis deleted during the run, outcome not saved");
            return;
        }
        store.upsert(analysis.clone()).await;
    }

    /// Open the report of a saved, completed analysis
    pub async fn view_analysis(&self, id: &str) -> Result<DashboardSnapshot, DashboardError> {
        let report = {
            let store = self.store.lock().await;
            let analysis = store
                .get(id)
                .ok_or_else(|| DashboardError::AnalysisNotFound(id.to_string()))?;

            if analysis.status != AnalysisStatus::Completed {
                return Err(DashboardError::AnalysisNotCompleted(id.to_string()));
            }
            ActiveReport::new(analysis, false)
        };

        self.dispatch(DashboardEvent::ViewReport(Box::new(report)))
            .await?;
        Ok(self.snapshot().await)
    }

    pub async fn delete_analysis(&self, id: &str) -> Result<(), DashboardError> {
        if self.store.lock().await.delete(id).await {
            tracing::info!(analysis_id = %id, "Analysis deleted");
            Ok(())
        } else {
            Err(DashboardError::AnalysisNotFound(id.to_string()))
        }
    }

    async fn active_report(&self) -> Result<ActiveReport, DashboardError> {
        match &*self.view.lock().await {
            DashboardView::Dashboard(report) => Ok(report.as_ref().clone()),
            _ => Err(DashboardError::NoActiveReport),
        }
    }

    pub async fn claims_table(
        &self,
        query: &ClaimsTableQuery,
    ) -> Result<Vec<ClaimRow>, DashboardError> {
        let report = self.active_report().await?;
        Ok(claims_table(&report.merged(), query))
    }

    pub async fn risk_distribution(&self) -> Result<Vec<RiskBin>, DashboardError> {
        let report = self.active_report().await?;
        Ok(risk_distribution(&report.merged()))
    }

    /// Detail panel for one claim, with a model explanation
    pub async fn claim_detail(&self, claim_id: &str) -> Result<ClaimDetail, DashboardError> {
        let report = self.active_report().await?;
        let item = report
            .find(claim_id)
            .ok_or_else(|| DashboardError::ClaimNotFound(claim_id.to_string()))?;

        let explanation = self
            .explain_or(&claim_summary(&item.claim), DETAIL_EXPLANATION_FALLBACK)
            .await;

        Ok(ClaimDetail::new(&item, explanation))
    }

    /// Risk-factors panel for a selected claim or for the whole dataset
    pub async fn risk_factors_panel(
        &self,
        claim_id: Option<&str>,
    ) -> Result<RiskFactorsPanel, DashboardError> {
        let report = self.active_report().await?;

        let summary = match claim_id {
            Some(id) => {
                let item = report
                    .find(id)
                    .ok_or_else(|| DashboardError::ClaimNotFound(id.to_string()))?;
                Some(selected_claim_summary(&item))
            }
            None => dataset_summary(&report.claims),
        };

        let explanation = match summary {
            Some(summary) => self.explain_or(&summary, PANEL_EXPLANATION_FALLBACK).await,
            None => PANEL_PLACEHOLDER.to_string(),
        };

        Ok(RiskFactorsPanel::new(claim_id, explanation))
    }

    async fn explain_or(&self, summary: &str, fallback: &str) -> String {
        match self.model.explain(summary, MODEL_PARAMETERS).await {
            Ok(explanation) => explanation,
            Err(e) => {
                tracing::warn!(error = %e, "Explanation unavailable, using fallback");
                fallback.to_string()
            }
        }
    }
}

fn log_unmatched(analysis_id: &str, claims: &[Claim], predictions: &[FraudPrediction]) {
    let unknown: Vec<&str> = predictions
        .iter()
        .map(|p| p.claim_id.as_str())
        .filter(|id| !claims.iter().any(|c| c.id == *id))
        .collect();
    if !unknown.is_empty() {
        tracing::warn!(
            analysis_id = %analysis_id,
            claim_ids = ?unknown,
            "Predictions reference unknown claims"
        );
    }

    let unscored = claims
        .iter()
        .filter(|c| !predictions.iter().any(|p| p.claim_id == c.id))
        .count();
    if unscored > 0 {
        tracing::warn!(
            analysis_id = %analysis_id,
            unscored = unscored,
            "Some claims received no prediction"
        );
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::service::prediction::testing::{FakeFraudModel, prediction};
    use crate::service::prediction::{ExplanationError, PredictionError};
    use crate::service::store::InMemoryAnalysisStorage;

    const SAMPLE_LIKELIHOODS: [f64; 12] =
        [0.85, 0.3, 0.05, 0.8, 0.99, 0.5, 0.1, 0.72, 0.45, 0.2, 0.6, 0.91];

    fn sample_predictions() -> Vec<FraudPrediction> {
        SAMPLE_LIKELIHOODS
            .iter()
            .enumerate()
            .map(|(i, l)| prediction(&(i + 1).to_string(), *l, &["High amount"]))
            .collect()
    }

    async fn controller_for(model: Arc<dyn FraudModel>) -> Arc<DashboardController> {
        let store = AnalysisStore::open(Box::new(InMemoryAnalysisStorage::new())).await;
        Arc::new(DashboardController::new(
            model,
            store,
            PacingConfig::immediate(),
        ))
    }

    async fn controller_with(model: FakeFraudModel) -> (Arc<DashboardController>, Arc<FakeFraudModel>) {
        let model = Arc::new(model);
        let controller = controller_for(model.clone()).await;
        (controller, model)
    }

    /// Model whose scoring call crashes
    struct PanickingModel;

    #[async_trait]
    impl FraudModel for PanickingModel {
        async fn predict(&self, _claim_data: &str) -> Result<Vec<FraudPrediction>, PredictionError> {
            panic!("scoring crashed");
        }

        async fn explain(
            &self,
            _claim_summary: &str,
            _model_parameters: &str,
        ) -> Result<String, ExplanationError> {
            Ok(String::new())
        }
    }

    /// Model that holds the scoring call until released
    #[derive(Default)]
    struct GatedModel {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl FraudModel for GatedModel {
        async fn predict(&self, _claim_data: &str) -> Result<Vec<FraudPrediction>, PredictionError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(Vec::new())
        }

        async fn explain(
            &self,
            _claim_summary: &str,
            _model_parameters: &str,
        ) -> Result<String, ExplanationError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_upload_sample_dataset_opens_report() {
        let (controller, model) =
            controller_with(FakeFraudModel::scoring(sample_predictions())).await;

        let snapshot = controller
            .upload("claims.csv", SAMPLE_CLAIMS_CSV.to_string())
            .await
            .unwrap();

        match snapshot {
            DashboardSnapshot::Dashboard {
                summary, is_demo, ..
            } => {
                assert_eq!(summary.total_claims, 12);
                assert!(!is_demo);
            }
            other => panic!("unexpected view: {:?}", other),
        }
        assert_eq!(model.calls(), 1);

        let overview = controller.overview().await;
        assert_eq!(overview.analyses.len(), 1);
        assert_eq!(overview.analyses[0].status, AnalysisStatus::Completed);
        assert_eq!(overview.analyses[0].file_name, "claims.csv");
    }

    #[tokio::test]
    async fn test_high_risk_claim_feeds_summary() {
        let (controller, _) = controller_with(FakeFraudModel::scoring(vec![prediction(
            "1",
            0.85,
            &["High amount"],
        )]))
        .await;

        let snapshot = controller
            .upload("claims.csv", SAMPLE_CLAIMS_CSV.to_string())
            .await
            .unwrap();

        let DashboardSnapshot::Dashboard { summary, .. } = snapshot else {
            panic!("expected dashboard view");
        };
        // Claim 1 has a total amount of 50000
        assert_eq!(summary.high_risk_claims, 1);
        assert_eq!(summary.potential_fraud_amount, 50000.0);
    }

    #[tokio::test]
    async fn test_parse_failure_ends_in_error_without_analysis() {
        let (controller, model) =
            controller_with(FakeFraudModel::scoring(sample_predictions())).await;

        let snapshot = controller
            .upload("bad.csv", "claim_id,amount\n1,2,3\n".to_string())
            .await
            .unwrap();

        match snapshot {
            DashboardSnapshot::Error { message } => assert_eq!(message, PARSE_ERROR_MESSAGE),
            other => panic!("unexpected view: {:?}", other),
        }
        assert_eq!(model.calls(), 0);
        assert!(controller.overview().await.analyses.is_empty());
    }

    #[tokio::test]
    async fn test_prediction_failure_marks_analysis_failed() {
        let (controller, _) = controller_with(FakeFraudModel::failing()).await;

        let snapshot = controller
            .upload("claims.csv", SAMPLE_CLAIMS_CSV.to_string())
            .await
            .unwrap();

        match snapshot {
            DashboardSnapshot::Error { message } => {
                assert_eq!(message, PREDICTION_ERROR_MESSAGE)
            }
            other => panic!("unexpected view: {:?}", other),
        }

        controller.try_again().await.unwrap();
        let overview = controller.overview().await;
        assert_eq!(overview.analyses.len(), 1);
        assert_eq!(overview.analyses[0].status, AnalysisStatus::Failed);
        assert!(!overview.analyses[0].can_view_report);
        assert!(overview.all_time.is_none());
    }

    #[tokio::test]
    async fn test_crashed_scoring_ends_in_error() {
        let controller = controller_for(Arc::new(PanickingModel)).await;

        let snapshot = controller
            .upload("claims.csv", SAMPLE_CLAIMS_CSV.to_string())
            .await
            .unwrap();

        match snapshot {
            DashboardSnapshot::Error { message } => {
                assert_eq!(message, PREDICTION_ERROR_MESSAGE)
            }
            other => panic!("unexpected view: {:?}", other),
        }

        controller.try_again().await.unwrap();
        let overview = controller.overview().await;
        assert_eq!(overview.analyses.len(), 1);
        assert_eq!(overview.analyses[0].status, AnalysisStatus::Failed);
    }

    #[tokio::test]
    async fn test_analysis_deleted_mid_run_stays_deleted() {
        let model = Arc::new(GatedModel::default());
        let controller = controller_for(model.clone()).await;

        let run = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                controller
                    .upload("claims.csv", SAMPLE_CLAIMS_CSV.to_string())
                    .await
            })
        };

        model.started.notified().await;
        let analyses = controller.overview().await.analyses;
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].status, AnalysisStatus::Processing);
        controller.delete_analysis(&analyses[0].id).await.unwrap();

        model.release.notify_one();
        let snapshot = run.await.unwrap().unwrap();
        assert!(matches!(snapshot, DashboardSnapshot::Dashboard { .. }));

        controller.show_analyses().await.unwrap();
        assert!(controller.overview().await.analyses.is_empty());
    }

    #[tokio::test]
    async fn test_sample_runs_are_not_persisted() {
        let (controller, _) =
            controller_with(FakeFraudModel::scoring(sample_predictions())).await;

        let snapshot = controller.use_sample_data(true).await.unwrap();
        match snapshot {
            DashboardSnapshot::Dashboard {
                file_name, is_demo, ..
            } => {
                assert_eq!(file_name, DEMO_FILE_NAME);
                assert!(is_demo);
            }
            other => panic!("unexpected view: {:?}", other),
        }

        assert!(controller.overview().await.analyses.is_empty());
    }

    #[tokio::test]
    async fn test_second_run_rejected_while_loading() {
        let (controller, model) =
            controller_with(FakeFraudModel::scoring(sample_predictions())).await;

        *controller.view.lock().await = DashboardView::Loading {
            file_name: "first.csv".to_string(),
            step: LoadingStep::Analyzing,
        };

        let result = controller
            .upload("second.csv", SAMPLE_CLAIMS_CSV.to_string())
            .await;
        assert!(matches!(
            result,
            Err(DashboardError::InvalidTransition { from: "loading", .. })
        ));
        assert_eq!(model.calls(), 0);
        assert!(controller.overview().await.analyses.is_empty());
    }

    #[tokio::test]
    async fn test_delete_keeps_order_of_others() {
        let (controller, _) =
            controller_with(FakeFraudModel::scoring(sample_predictions())).await;

        for name in ["a.csv", "b.csv", "c.csv"] {
            controller
                .upload(name, SAMPLE_CLAIMS_CSV.to_string())
                .await
                .unwrap();
            controller.show_analyses().await.unwrap();
        }

        let before = controller.overview().await.analyses;
        let names: Vec<&str> = before.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["c.csv", "b.csv", "a.csv"]);

        controller.delete_analysis(&before[1].id).await.unwrap();

        let after = controller.overview().await.analyses;
        let names: Vec<&str> = after.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["c.csv", "a.csv"]);

        assert!(matches!(
            controller.delete_analysis(&before[1].id).await,
            Err(DashboardError::AnalysisNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_view_saved_report() {
        let (controller, _) =
            controller_with(FakeFraudModel::scoring(sample_predictions())).await;

        controller
            .upload("a.csv", SAMPLE_CLAIMS_CSV.to_string())
            .await
            .unwrap();
        controller.show_analyses().await.unwrap();

        let id = controller.overview().await.analyses[0].id.clone();
        let snapshot = controller.view_analysis(&id).await.unwrap();
        assert!(matches!(
            snapshot,
            DashboardSnapshot::Dashboard { ref analysis_id, .. } if *analysis_id == id
        ));

        // Only reachable from the initial view
        assert!(controller.view_analysis(&id).await.is_err());
        assert!(matches!(
            controller.view_analysis("missing").await,
            Err(DashboardError::AnalysisNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_analysis_has_no_report() {
        let (controller, _) = controller_with(FakeFraudModel::failing()).await;

        controller
            .upload("a.csv", SAMPLE_CLAIMS_CSV.to_string())
            .await
            .unwrap();
        controller.try_again().await.unwrap();

        let id = controller.overview().await.analyses[0].id.clone();
        assert!(matches!(
            controller.view_analysis(&id).await,
            Err(DashboardError::AnalysisNotCompleted(_))
        ));
    }

    #[tokio::test]
    async fn test_report_views_need_open_report() {
        let (controller, _) =
            controller_with(FakeFraudModel::scoring(sample_predictions())).await;

        assert!(matches!(
            controller.risk_distribution().await,
            Err(DashboardError::NoActiveReport)
        ));
        assert!(matches!(
            controller.claims_table(&ClaimsTableQuery::default()).await,
            Err(DashboardError::NoActiveReport)
        ));
    }

    #[tokio::test]
    async fn test_report_views() {
        let (controller, _) =
            controller_with(FakeFraudModel::scoring(sample_predictions())).await;
        controller.use_sample_data(false).await.unwrap();

        let rows = controller
            .claims_table(&ClaimsTableQuery::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].id, "5");

        let bins = controller.risk_distribution().await.unwrap();
        assert_eq!(bins.iter().map(|b| b.claims).sum::<usize>(), 12);

        let detail = controller.claim_detail("1").await.unwrap();
        assert_eq!(detail.likelihood_display, "85.0%");
        assert_eq!(
            detail.explanation,
            "Large claim relative to the policy history."
        );

        assert!(matches!(
            controller.claim_detail("nope").await,
            Err(DashboardError::ClaimNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_explanation_failure_uses_fallback() {
        let mut model = FakeFraudModel::scoring(sample_predictions());
        model.explanation = Err("timeout".to_string());
        let (controller, _) = controller_with(model).await;
        controller.use_sample_data(false).await.unwrap();

        let detail = controller.claim_detail("1").await.unwrap();
        assert_eq!(detail.explanation, DETAIL_EXPLANATION_FALLBACK);

        let panel = controller.risk_factors_panel(None).await.unwrap();
        assert_eq!(panel.explanation, PANEL_EXPLANATION_FALLBACK);

        let panel = controller.risk_factors_panel(Some("2")).await.unwrap();
        assert_eq!(panel.explanation, PANEL_EXPLANATION_FALLBACK);
    }

    #[tokio::test]
    async fn test_panel_placeholder_without_claims() {
        let (controller, _) = controller_with(FakeFraudModel::scoring(vec![])).await;

        controller
            .upload("empty.csv", "claim_id,total_claim_amount\n".to_string())
            .await
            .unwrap();

        let panel = controller.risk_factors_panel(None).await.unwrap();
        assert_eq!(panel.explanation, PANEL_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_demo_on_load_only_when_idle() {
        let (controller, _) =
            controller_with(FakeFraudModel::scoring(sample_predictions())).await;

        controller.new_analysis().await.unwrap();
        let snapshot = controller.demo_on_load().await.unwrap();
        assert!(matches!(snapshot, DashboardSnapshot::Upload { .. }));

        controller.show_analyses().await.unwrap();
        let snapshot = controller.demo_on_load().await.unwrap();
        assert!(!matches!(snapshot, DashboardSnapshot::Initial { .. }));

        for _ in 0..100 {
            if matches!(controller.snapshot().await, DashboardSnapshot::Dashboard { .. }) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        match controller.snapshot().await {
            DashboardSnapshot::Dashboard { is_demo, .. } => assert!(is_demo),
            other => panic!("unexpected view: {:?}", other),
        }
    }
}
