//! Superficie HTTP (axum).
//!
//! - `POST /predecir`: prioriza, registra y avisa.
//! - `GET /records`: historial, el más reciente primero.
//! - `GET /records/summary`: `{total, critical, today}`.
//! - `GET /health`: estado, huella del modelo y modo del notifier.
pub mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use autogest_core::PriorityService;
use log::info;
use uuid::Uuid;

/// Estado compartido por los handlers; todo inmutable tras el arranque.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PriorityService>,
    pub model_fingerprint: Arc<str>,
}

impl AppState {
    pub fn new(service: PriorityService, model_fingerprint: impl Into<Arc<str>>) -> Self {
        Self { service: Arc::new(service),
               model_fingerprint: model_fingerprint.into() }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/predecir", post(handlers::predict))
                 .route("/records", get(handlers::list_records))
                 .route("/records/summary", get(handlers::summary))
                 .route("/health", get(handlers::health))
                 .layer(middleware::from_fn(request_id))
                 .with_state(state)
}

/// Propaga o genera `x-request-id` y deja una línea de log por petición.
async fn request_id(req: Request, next: Next) -> Response {
    let request_id = req.headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(req).await;

    info!("{method} {path} status={} elapsed_ms={} request_id={request_id}",
          response.status().as_u16(),
          started.elapsed().as_millis());
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}
