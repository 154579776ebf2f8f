use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_endpoint: String,
    /// Base URL under which buckets are publicly readable (MinIO console or CDN).
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub ollama_host: String,
    pub ollama_model: String,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl_secs: u64,
    pub extract_job_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_public_url: require_env("S3_PUBLIC_URL")?
                .trim_end_matches('/')
                .to_string(),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            ollama_host: optional_env("OLLAMA_HOST", "http://ollama:11434"),
            ollama_model: optional_env("OLLAMA_MODEL", crate::llm_client::DEFAULT_MODEL),
            port: optional_env("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            session_ttl_secs: optional_env("SESSION_TTL_SECS", "28800")
                .parse::<u64>()
                .context("SESSION_TTL_SECS must be a number of seconds")?,
            extract_job_ttl_secs: optional_env("EXTRACT_JOB_TTL_SECS", "3600")
                .parse::<u64>()
                .context("EXTRACT_JOB_TTL_SECS must be a number of seconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
