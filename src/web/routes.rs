//! HTTP handlers with response caching

use axum::{extract::State, Json};
use cached::proc_macro::cached;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;
use crate::analytics::collections;
use crate::analytics::stats::{StatsAggregator, StatsRequest, StatsResponse};
use crate::error::ApiError;
use crate::store::{CollectionQuery, DocumentStore};

/// Service health: one cheap store round-trip plus the loaded model list.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let probe = CollectionQuery::new(collections::USERS, "createdAt").with_limit(1);
    state.store.query(&probe).await?;

    Ok(Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "models_loaded": state.models.names(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct DiseaseRequest {
    pub symptoms: String,
}

pub async fn predict_disease(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DiseaseRequest>,
) -> Result<Json<Value>, ApiError> {
    let prediction = state.models.disease.classify(&request.symptoms).ok_or_else(|| {
        ApiError::InvalidRequest(
            "symptoms did not match any known condition; please be more specific".into(),
        )
    })?;
    Ok(Json(json!({ "prediction": prediction })))
}

#[derive(Debug, Deserialize)]
pub struct MentalHealthRequest {
    pub message: String,
}

pub async fn predict_mental_health(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MentalHealthRequest>,
) -> Json<Value> {
    let label = state.models.mental_health.classify(&request.message);
    Json(json!({ "reply": label }))
}

#[derive(Debug, Deserialize)]
pub struct AssistanceRequest {
    pub query: String,
}

pub async fn medical_assistance(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssistanceRequest>,
) -> Json<Value> {
    match state.models.medical_qa.search(&request.query, 1).into_iter().next() {
        Some(answer) => Json(json!({ "reply": answer })),
        None => Json(json!({
            "reply": "Sorry, I could not find relevant information based on your query."
        })),
    }
}

/// Cached default-window stats - 5 minute TTL. Only the parameterless GET
/// shape is cached; filtered requests always recompute.
#[cached(time = 300, key = "()", convert = r#"{ () }"#, result = true)]
async fn cached_default_stats(stats: StatsAggregator) -> Result<StatsResponse, ApiError> {
    stats.run(StatsRequest::default_window()).await
}

/// GET /admin/stats - default trailing window, cached.
pub async fn admin_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let response = cached_default_stats(state.stats.clone()).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize, Default)]
pub struct StatsRequestBody {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gender: Option<String>,
}

/// POST /admin/stats - explicit window and gender filter, uncached.
pub async fn admin_stats_filtered(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StatsRequestBody>,
) -> Result<Json<StatsResponse>, ApiError> {
    let request = StatsRequest {
        start_date: body.start_date,
        end_date: body.end_date,
        gender: body.gender,
        filtered: true,
    };
    let response = state.stats.run(request).await?;
    Ok(Json(response))
}
