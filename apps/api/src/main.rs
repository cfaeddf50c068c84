mod analysis;
mod config;
mod critique;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Critic API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    if config.google_api_key.is_none() {
        warn!("GOOGLE_API_KEY is not set; critique requests will fail");
    }
    let llm = LlmClient::from_config(&config)?;
    info!("LLM client initialized (model: {})", config.gemini_model);

    // Initialize extraction pipeline
    let extractor = TextExtractor::with_system_ocr(&config.ocr);
    info!(
        "Text extractor initialized (OCR: {} + {}, {} dpi, lang {})",
        config.ocr.pdftoppm_bin, config.ocr.tesseract_bin, config.ocr.dpi, config.ocr.language
    );

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        extractor: Arc::new(extractor),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
