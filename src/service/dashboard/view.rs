//! Dashboard view-state machine
//!
//! `DashboardView` is the only state the controller keeps about what the user
//! sees. Every change goes through [`transition`], which either yields the next
//! view or rejects the event and leaves the current view untouched.

use serde::Serialize;
use utoipa::ToSchema;

use super::error::DashboardError;
use crate::model::{Analysis, Claim, ClaimWithPrediction, FraudPrediction};
use crate::service::report::{SummaryStats, merge};

/// Progress of a running analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoadingStep {
    Uploading,
    Analyzing,
    Predicting,
    Done,
}

impl LoadingStep {
    /// The step that follows this one, if any
    pub fn next(self) -> Option<Self> {
        match self {
            LoadingStep::Uploading => Some(LoadingStep::Analyzing),
            LoadingStep::Analyzing => Some(LoadingStep::Predicting),
            LoadingStep::Predicting => Some(LoadingStep::Done),
            LoadingStep::Done => None,
        }
    }
}

/// The report currently on screen
///
/// Always carries the claims and predictions it renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveReport {
    pub analysis_id: String,
    pub file_name: String,
    pub is_demo: bool,
    pub claims: Vec<Claim>,
    pub predictions: Vec<FraudPrediction>,
}

impl ActiveReport {
    pub fn new(analysis: &Analysis, is_demo: bool) -> Self {
        Self {
            analysis_id: analysis.id.clone(),
            file_name: analysis.file_name.clone(),
            is_demo,
            claims: analysis.claims.clone(),
            predictions: analysis.predictions.clone(),
        }
    }

    pub fn merged(&self) -> Vec<ClaimWithPrediction> {
        merge(&self.claims, &self.predictions)
    }

    pub fn summary(&self) -> SummaryStats {
        SummaryStats::from_claims(&self.merged())
    }

    pub fn find(&self, claim_id: &str) -> Option<ClaimWithPrediction> {
        self.merged().into_iter().find(|c| c.claim.id == claim_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// Past analyses and all-time aggregates
    Initial,
    /// Upload form
    Upload,
    Loading {
        file_name: String,
        step: LoadingStep,
    },
    Dashboard(Box<ActiveReport>),
    /// Terminal until the user retries
    Error { message: String },
}

impl DashboardView {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardView::Initial => "initial",
            DashboardView::Upload => "upload",
            DashboardView::Loading { .. } => "loading",
            DashboardView::Dashboard(_) => "dashboard",
            DashboardView::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    NewAnalysis,
    ShowAnalyses,
    StartRun { file_name: String },
    StepAdvanced(LoadingStep),
    RunSucceeded(Box<ActiveReport>),
    RunFailed { message: String },
    ViewReport(Box<ActiveReport>),
    TryAgain,
}

impl DashboardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardEvent::NewAnalysis => "start a new analysis",
            DashboardEvent::ShowAnalyses => "show analyses",
            DashboardEvent::StartRun { .. } => "start a run",
            DashboardEvent::StepAdvanced(_) => "advance the loading step",
            DashboardEvent::RunSucceeded(_) => "show the run result",
            DashboardEvent::RunFailed { .. } => "report a run failure",
            DashboardEvent::ViewReport(_) => "open a report",
            DashboardEvent::TryAgain => "try again",
        }
    }
}

/// Compute the view that follows `event`
pub fn transition(
    view: &DashboardView,
    event: DashboardEvent,
) -> Result<DashboardView, DashboardError> {
    use DashboardEvent as E;
    use DashboardView as V;

    let rejected = |event: &DashboardEvent| DashboardError::InvalidTransition {
        from: view.name(),
        event: event.name(),
    };

    match (view, event) {
        (V::Initial | V::Upload, E::StartRun { file_name }) => Ok(V::Loading {
            file_name,
            step: LoadingStep::Uploading,
        }),

        (V::Loading { file_name, step }, E::StepAdvanced(next)) if step.next() == Some(next) => {
            Ok(V::Loading {
                file_name: file_name.clone(),
                step: next,
            })
        }

        (V::Loading { .. }, E::RunSucceeded(report)) => Ok(V::Dashboard(report)),

        (V::Loading { .. }, E::RunFailed { message }) => Ok(V::Error { message }),

        (V::Error { .. }, E::TryAgain) => Ok(V::Initial),

        (V::Initial | V::Upload | V::Dashboard(_), E::NewAnalysis) => Ok(V::Upload),

        (V::Initial | V::Upload | V::Dashboard(_), E::ShowAnalyses) => Ok(V::Initial),

        (V::Initial, E::ViewReport(report)) => Ok(V::Dashboard(report)),

        (_, event) => Err(rejected(&event)),
    }
}
