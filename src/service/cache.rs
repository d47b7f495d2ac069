//! Redis cache for LLM explanations

use std::env;

use redis::{AsyncCommands, Client};

// Environment variable names
const ENV_REDIS_HOST: &str = "CLAIMGUARD_REDIS_HOST";
const ENV_REDIS_PORT: &str = "CLAIMGUARD_REDIS_PORT";
const ENV_REDIS_PASSWORD: &str = "CLAIMGUARD_REDIS_PASSWORD";
const ENV_REDIS_DB: &str = "CLAIMGUARD_REDIS_DB";
const ENV_CACHE_TTL: &str = "CLAIMGUARD_CACHE_TTL";

// Default values
const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: &str = "6379";
const DEFAULT_REDIS_DB: &str = "0";
const DEFAULT_TTL_SECONDS: u64 = 24 * 60 * 60; // 1 day

const PREFIX_EXPLANATION: &str = "explanation:";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Cache miss for key: {0}")]
    Miss(String),
}

/// Redis-backed cache for explanation text
#[derive(Clone)]
pub struct ExplanationCache {
    client: Client,
    ttl_seconds: u64,
}

impl ExplanationCache {
    /// Create a new cache instance and verify connection
    ///
    /// Configuration via environment variables:
    /// - `CLAIMGUARD_REDIS_HOST` - Redis host (default: 127.0.0.1)
    /// - `CLAIMGUARD_REDIS_PORT` - Redis port (default: 6379)
    /// - `CLAIMGUARD_REDIS_PASSWORD` - Redis password (default: none)
    /// - `CLAIMGUARD_REDIS_DB` - Redis database number (default: 0)
    /// - `CLAIMGUARD_CACHE_TTL` - Cache TTL in seconds (default: 86400)
    pub async fn new() -> Result<Self, CacheError> {
        let host = env::var(ENV_REDIS_HOST).unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string());
        let port = env::var(ENV_REDIS_PORT).unwrap_or_else(|_| DEFAULT_REDIS_PORT.to_string());
        let password = env::var(ENV_REDIS_PASSWORD).ok();
        let db = env::var(ENV_REDIS_DB).unwrap_or_else(|_| DEFAULT_REDIS_DB.to_string());

        let ttl_seconds = env::var(ENV_CACHE_TTL)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECONDS);

        // redis://[password@]host:port/db
        let redis_url = match password {
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        tracing::debug!(host = %host, port = %port, db = %db, "Connecting to Redis");

        let client = Client::open(redis_url)?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        tracing::info!(host = %host, port = %port, "Redis connection established");

        Ok(Self {
            client,
            ttl_seconds,
        })
    }

    /// Get a cached explanation by key hash
    pub async fn get_explanation(&self, key_hash: &str) -> Result<String, CacheError> {
        let full_key = format!("{}{}", PREFIX_EXPLANATION, key_hash);
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let data: Option<String> = conn.get(&full_key).await?;
        data.ok_or_else(|| CacheError::Miss(key_hash.to_string()))
    }

    /// Cache an explanation by key hash
    pub async fn set_explanation(&self, key_hash: &str, explanation: &str) -> Result<(), CacheError> {
        let full_key = format!("{}{}", PREFIX_EXPLANATION, key_hash);
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(&full_key, explanation, self.ttl_seconds).await?;

        tracing::debug!(key = %full_key, ttl = self.ttl_seconds, "Cached explanation");
        Ok(())
    }

    /// Check the connection is alive
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
