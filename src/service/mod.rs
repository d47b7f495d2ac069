pub mod cache;
pub mod cache_keys;
pub mod dashboard;
pub mod llm;
pub mod parser;
pub mod prediction;
pub mod report;
pub mod store;

pub use cache::ExplanationCache;
pub use dashboard::DashboardController;
pub use llm::LlmClient;
pub use prediction::LlmPredictionClient;
pub use store::{AnalysisStore, InMemoryAnalysisStorage};
