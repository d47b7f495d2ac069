//! Application state and service initialization
//!
//! This module centralizes service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::PgAnalysisStorage;
use crate::model::Config;
use crate::service::llm::ENV_OPENAI_API_KEY;
use crate::service::store::AnalysisStorage;
use crate::service::{
    AnalysisStore, DashboardController, ExplanationCache, InMemoryAnalysisStorage, LlmClient,
    LlmPredictionClient,
};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Database connection pool; `None` when running on in-memory storage
    pub db_pool: Option<PgPool>,
    /// Redis cache (optional)
    pub cache: Option<ExplanationCache>,
    /// Dashboard controller shared by all handlers
    pub controller: Arc<DashboardController>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization (falls back to memory)
    /// 2. Redis cache initialization (optional)
    /// 3. LLM client initialization (requires OPENAI_API_KEY)
    /// 4. Analysis store and controller construction
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let db_pool = Self::connect_database().await;

        // Initialize Redis cache (optional - will log warning if Redis is unavailable)
        let cache = match ExplanationCache::new().await {
            Ok(cache) => {
                tracing::info!("Redis cache enabled");
                Some(cache)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis cache unavailable, running without cache");
                None
            }
        };

        // Create shared LLM client (required)
        let api_key = std::env::var(ENV_OPENAI_API_KEY)
            .map_err(|_| AppError::MissingConfig(ENV_OPENAI_API_KEY))?;

        let llm_client = LlmClient::new(&api_key)
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        let model = Arc::new(LlmPredictionClient::new(llm_client, cache.clone()));

        let storage: Box<dyn AnalysisStorage> = match db_pool {
            Some(ref pool) => Box::new(PgAnalysisStorage::new(pool.clone())),
            None => Box::new(InMemoryAnalysisStorage::new()),
        };
        let store = AnalysisStore::open(storage).await;

        let controller = Arc::new(DashboardController::new(model, store, config.pacing));

        Ok(Self {
            db_pool,
            cache,
            controller,
        })
    }

    /// Connect to PostgreSQL and prepare the schema
    ///
    /// Any failure is logged and the service continues on in-memory storage.
    async fn connect_database() -> Option<PgPool> {
        let pool = match crate::db::create_pool().await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "PostgreSQL unavailable, analyses will not survive a restart");
                return None;
            }
        };

        if let Err(e) = crate::db::init_schema(&pool).await {
            tracing::warn!(error = %e, "Failed to initialize database schema, using in-memory storage");
            return None;
        }

        Some(pool)
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
