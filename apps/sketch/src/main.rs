mod config;
mod errors;
mod evaluation_client;
mod models;
mod presenter;
mod routes;
mod state;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation_client::EvaluationClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::wizard::store::SessionStore;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skill Sketch v{}", env!("CARGO_PKG_VERSION"));

    // Initialize evaluation service client
    let evaluator = EvaluationClient::new(&config)?;
    info!(
        "Evaluation client initialized (base url: {}, timeout: {:?}s)",
        evaluator.base_url(),
        config.evaluation_timeout_secs
    );

    let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));
    tokio::spawn(sessions.clone().run_sweeper(SWEEP_INTERVAL));
    info!(
        "Session store ready (idle ttl: {}s, sweep every {}s)",
        config.session_ttl_secs,
        SWEEP_INTERVAL.as_secs()
    );

    let state = AppState {
        config: config.clone(),
        evaluator: Arc::new(evaluator),
        sessions,
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
