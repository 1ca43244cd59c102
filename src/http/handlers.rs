use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use autogest_domain::{HistorySummary, Priority, Record, SubmitRequest};
use chrono::Local;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prioridad: Priority,
    pub record_id: i64,
    pub notified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_fingerprint: String,
    /// `smtp` o `disabled`.
    pub notifier: String,
}

pub async fn predict(State(state): State<AppState>,
                     payload: Result<Json<SubmitRequest>, JsonRejection>)
                     -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.prioritize(&request)).await??;
    Ok(Json(PredictResponse { prioridad: result.priority,
                              record_id: result.record_id,
                              notified: result.notified }))
}

pub async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    let service = state.service.clone();
    let records = tokio::task::spawn_blocking(move || service.history()).await??;
    Ok(Json(records))
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<HistorySummary>, ApiError> {
    let service = state.service.clone();
    let today = Local::now().date_naive();
    let summary = tokio::task::spawn_blocking(move || service.summary(today)).await??;
    Ok(Json(summary))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let notifier = if state.service.notifier_enabled() { "smtp" } else { "disabled" };
    Json(HealthResponse { status: "ok".into(),
                          model_fingerprint: state.model_fingerprint.to_string(),
                          notifier: notifier.into() })
}
