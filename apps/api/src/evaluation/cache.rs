//! Evaluation Cache: the serialized last record under one fixed key.
//!
//! Each successful submission overwrites the previous entry. There is no expiry
//! and no history. `AppState` holds an `Arc<dyn EvaluationCache>`: Redis when
//! `REDIS_URL` is configured, in-process memory otherwise.

use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::evaluation::models::EvaluationRecord;

/// The single key the last evaluation is stored under.
pub const CACHE_KEY: &str = "evaluation_data";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cached evaluation is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait EvaluationCache: Send + Sync {
    /// Replaces the cached record.
    async fn store(&self, record: &EvaluationRecord) -> Result<(), CacheError>;

    /// Returns the last stored record, if any.
    async fn load(&self) -> Result<Option<EvaluationRecord>, CacheError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Redis backend
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisEvaluationCache {
    client: redis::Client,
}

impl RedisEvaluationCache {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EvaluationCache for RedisEvaluationCache {
    async fn store(&self, record: &EvaluationRecord) -> Result<(), CacheError> {
        let payload = serde_json::to_string(record)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(CACHE_KEY, payload).await?;
        debug!("Stored evaluation for '{}' in redis", record.candidate_name);
        Ok(())
    }

    async fn load(&self) -> Result<Option<EvaluationRecord>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(CACHE_KEY).await?;
        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(CacheError::from)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process backend
// ────────────────────────────────────────────────────────────────────────────

/// Keeps the serialized copy in memory. Lost on restart.
#[derive(Default)]
pub struct InMemoryEvaluationCache {
    slot: RwLock<Option<String>>,
}

#[async_trait]
impl EvaluationCache for InMemoryEvaluationCache {
    async fn store(&self, record: &EvaluationRecord) -> Result<(), CacheError> {
        let payload = serde_json::to_string(record)?;
        *self.slot.write().await = Some(payload);
        Ok(())
    }

    async fn load(&self) -> Result<Option<EvaluationRecord>, CacheError> {
        let slot = self.slot.read().await;
        slot.as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(CacheError::from)
    }
}
