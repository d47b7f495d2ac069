#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("Cannot {event} while the dashboard is in the {from} view")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },

    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),

    #[error("Analysis {0} has no completed report")]
    AnalysisNotCompleted(String),

    #[error("No report is open")]
    NoActiveReport,

    #[error("Claim not found in the open report: {0}")]
    ClaimNotFound(String),

    #[error("Analysis run aborted: {0}")]
    RunAborted(String),
}
