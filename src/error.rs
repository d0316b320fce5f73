//! Error taxonomy for the analytics API
//!
//! `InvalidRequest` surfaces before any store access, `StoreUnavailable`
//! covers transient backing-store failures, and `AggregationFailed` is
//! reserved for failures outside a dataset boundary (window resolution,
//! user-index build, final merge). Per-dataset failures never reach this
//! type; they are swallowed and zero-filled by the orchestrator.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("document store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("analytics aggregation failed: {0}")]
    AggregationFailed(#[source] anyhow::Error),
}

impl ApiError {
    pub fn aggregation(cause: impl Into<anyhow::Error>) -> Self {
        Self::AggregationFailed(cause.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::AggregationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::AggregationFailed(_) => "aggregation_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        let body = json!({
            "error": self.kind(),
            "message": self.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        (status, Json(body)).into_response()
    }
}
