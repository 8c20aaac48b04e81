mod auth;
mod checklist;
mod config;
mod contractors;
mod dashboard;
mod db;
mod drafting;
mod errors;
mod files;
mod intake;
mod llm_client;
mod mail;
mod models;
mod routes;
mod state;
mod store;
mod workflow;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::drafting::DraftingGateway;
use crate::files::{FileStore, LocalFileStore, S3FileStore};
use crate::llm_client::LlmClient;
use crate::mail::SimulatedMailTransport;
use crate::models::metro::reference_metros;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, RfpStore};

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

    info!("Starting RFP Desk API v{}", env!("CARGO_PKG_VERSION"));

    // Document store
    let store: Arc<dyn RfpStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None => Arc::new(MemoryStore::new()),
    };
    store.seed_metro_codes(&reference_metros()).await?;
    info!("Metro reference data seeded");

    // Uploaded files
    let files: Arc<dyn FileStore> = match &config.s3 {
        Some(s3) => Arc::new(S3FileStore::from_config(s3).await),
        None => {
            info!("No S3 bucket configured; storing uploads under {}", config.upload_dir);
            Arc::new(LocalFileStore::new(&config.upload_dir))
        }
    };

    // Hosted model, reached only through the drafting gateway
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let drafting = DraftingGateway::new(Arc::new(llm));

    let mail = Arc::new(SimulatedMailTransport::new(config.mail_from.clone()));

    let state = AppState {
        store,
        files,
        drafting,
        mail,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
