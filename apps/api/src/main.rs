mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;
mod tailoring;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::registry::SessionRegistry;
use crate::session::snapshot::SessionSnapshot;
use crate::session::store::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    if config.anthropic_api_key.is_none() {
        info!("ANTHROPIC_API_KEY not set; sessions must configure their own credential");
    }

    // Initialize LLM client
    let llm = LlmClient::new();
    info!(
        "LLM client initialized (endpoint: {}, default model: {})",
        llm.api_url(),
        config.default_model
    );

    let sessions = SessionRegistry::new();
    let mut seeded = None;
    if let Some(path) = &config.seed_session_file {
        let snapshot = SessionSnapshot::read_from_path(path)
            .with_context(|| format!("Failed to load seed session from {}", path.display()))?;
        let id = sessions
            .create_with(SessionStore::import(snapshot), config.default_oracle_settings())
            .await;
        info!("Seeded session {id} from {}", path.display());
        seeded = Some((id, path.clone()));
    }

    // Build app state
    let state = AppState {
        sessions: sessions.clone(),
        oracle: Arc::new(llm),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The seed file doubles as the save file for its session.
    if let Some((id, path)) = seeded {
        if !sessions.write_snapshot(id, &path).await? {
            info!("Seeded session {id} was ended; {} left unchanged", path.display());
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
