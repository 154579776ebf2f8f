use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Admin sessions and extraction jobs.
    pub redis: RedisClient,
    pub storage: Storage,
    pub llm: LlmClient,
    pub config: Config,
}
