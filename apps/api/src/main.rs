mod ads;
mod auth;
mod billing;
mod catalog;
mod config;
mod enhance;
mod errors;
mod events;
mod identity;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::events::LedgerEvents;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::{MemoryAdStore, MemoryPaymentStore};
use crate::store::pg::{PgAdStore, PgPaymentStore};
use crate::store::{AdStore, PaymentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CVForge API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage: Postgres when configured, in-memory otherwise
    let (payments, ads): (Arc<dyn PaymentStore>, Arc<dyn AdStore>) = match &config.database_url {
        Some(url) => {
            let pool = store::pg::connect(url).await?;
            info!("Postgres stores initialized");
            (
                Arc::new(PgPaymentStore::new(pool.clone())),
                Arc::new(PgAdStore::new(pool)),
            )
        }
        None => {
            info!("DATABASE_URL not set; using in-memory stores (state is lost on restart)");
            (
                Arc::new(MemoryPaymentStore::new()),
                Arc::new(MemoryAdStore::new()),
            )
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        payments,
        ads,
        identity: identity::default_provider(),
        llm,
        config: config.clone(),
        events: LedgerEvents::new(),
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
