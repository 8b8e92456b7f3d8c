mod analysis;
mod config;
mod errors;
mod extract;
mod interview;
mod llm_client;
mod models;
mod routes;
mod sanitize;
mod state;
mod upload;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::session::{InMemorySessionStore, SessionStore};
use crate::llm_client::{CompletionClient, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

/// How often the background task sweeps idle sessions.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerBoost API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm: Arc<dyn CompletionClient> =
        Arc::new(LlmClient::new(config.openrouter_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize session store and its eviction sweep
    let sessions: Arc<dyn SessionStore> =
        Arc::new(InMemorySessionStore::new(config.session_ttl));
    tokio::spawn(sweep_sessions(Arc::clone(&sessions)));
    info!(
        "Session store initialized (ttl: {}s)",
        config.session_ttl.as_secs()
    );

    // Build app state
    let state = AppState {
        llm,
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically evicts idle interview sessions.
async fn sweep_sessions(sessions: Arc<dyn SessionStore>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let evicted = sessions.purge_expired().await;
        if evicted > 0 {
            info!("Evicted {evicted} idle interview sessions");
        }
    }
}
