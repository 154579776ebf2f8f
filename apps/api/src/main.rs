use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recruit_api::config::Config;
use recruit_api::db::{create_pool, run_migrations};
use recruit_api::llm_client::LlmClient;
use recruit_api::routes::build_router;
use recruit_api::state::AppState;
use recruit_api::storage::{s3::S3Store, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("recruit_api={0},recruit_api::routes={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruitment API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO
    let store = S3Store::from_config(&config).await;
    let storage = Storage::new(Arc::new(store), config.s3_public_url.clone());
    storage.ensure_buckets().await;
    info!("Object storage ready at {}", config.s3_endpoint);

    // Initialize LLM client
    let llm = LlmClient::new(&config.ollama_host, &config.ollama_model)?;
    info!("LLM client initialized (model: {})", llm.model());

    let state = AppState {
        db,
        redis,
        storage,
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
