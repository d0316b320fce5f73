//! Medboard - analytics and prediction backend for a healthcare dashboard
//!
//! Serves three prediction endpoints (disease, mental health, medical
//! Q&A) and the `/admin/stats` aggregation endpoint that scans the
//! document store and assembles the dashboard's time-series summaries.

mod analytics;
mod config;
mod error;
mod inference;
mod store;
mod web;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use store::{MemoryStore, SharedStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before any other initialization)
    let _ = dotenvy::dotenv();

    let config = config::Config::load()?;

    // RUST_LOG overrides the configured level; LOG_FORMAT=gcp switches to
    // structured GCP Cloud Logging output.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "gcp" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!("Starting medboard...");
    info!("Configuration loaded");

    let store: SharedStore = match config.store.backend.as_str() {
        "sqlite" => {
            let store = SqliteStore::new(&config.store.url).await?;
            store.run_migrations().await?;
            Arc::new(store)
        }
        _ => Arc::new(MemoryStore::new()),
    };
    info!("Document store initialized ({})", config.store.backend);

    let models = inference::Models::load(&config.models)?;

    web::start_server(&config, store, models).await?;

    Ok(())
}
