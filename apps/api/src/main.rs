mod config;
mod errors;
mod evaluation;
mod extraction;
mod llm_client;
mod report;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation::cache::{EvaluationCache, InMemoryEvaluationCache, RedisEvaluationCache};
use crate::extraction::PdfTextExtractor;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Feedback Evaluator v{}", env!("CARGO_PKG_VERSION"));

    // Evaluation cache: Redis when configured, in-process otherwise
    let cache: Arc<dyn EvaluationCache> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Evaluation cache: redis");
            Arc::new(RedisEvaluationCache::new(client))
        }
        None => {
            info!("Evaluation cache: in-memory (REDIS_URL not set)");
            Arc::new(InMemoryEvaluationCache::default())
        }
    };

    let llm = LlmClient::new(config.llm_endpoint(), config.llm_timeout)?;
    info!(
        "LLM client initialized (deployment: {}, timeout: {:?})",
        config.azure_openai_deployment, config.llm_timeout
    );

    let extractor = PdfTextExtractor::new(config.pdf_page_limit);
    info!("PDF extractor initialized (page limit: {})", config.pdf_page_limit);

    let state = AppState {
        llm: Arc::new(llm),
        extractor: Arc::new(extractor),
        cache,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the report front-end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
