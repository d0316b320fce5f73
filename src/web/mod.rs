//! Web server module

mod routes;

use anyhow::Result;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::analytics::stats::StatsAggregator;
use crate::config::Config;
use crate::inference::Models;
use crate::store::SharedStore;

pub struct AppState {
    pub store: SharedStore,
    pub stats: StatsAggregator,
    pub models: Models,
}

pub async fn start_server(config: &Config, store: SharedStore, models: Models) -> Result<()> {
    let stats = StatsAggregator::new(store.clone(), config.analytics_settings());
    let state = Arc::new(AppState { store, stats, models });

    let cors = if config.server.allowed_origin.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(config.server.allowed_origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/disease", post(routes::predict_disease))
        .route("/mental_health", post(routes::predict_mental_health))
        .route("/medical_assistance", post(routes::medical_assistance))
        .route(
            "/admin/stats",
            get(routes::admin_stats).post(routes::admin_stats_filtered),
        )
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Web server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
