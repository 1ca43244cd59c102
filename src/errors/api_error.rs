use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use autogest_core::PrioritizeError;
use log::error;
use serde::Serialize;

/// Cuerpo de error del API: `{"error": <código>, "message": <detalle>}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Prioritize(PrioritizeError),
    /// Cuerpo ausente, JSON malformado o campos faltantes.
    MalformedBody(String),
    /// La tarea bloqueante no terminó (panic o cancelación).
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Prioritize(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Prioritize(PrioritizeError::InvalidInput(_)) | Self::MalformedBody(_) => "invalid_input",
            Self::Prioritize(PrioritizeError::UnknownCategory(_)) => "unknown_category",
            Self::Prioritize(PrioritizeError::ClassifierFault(_)) => "classifier_fault",
            Self::Prioritize(PrioritizeError::Storage(_)) => "storage_fault",
            Self::Internal(_) => "internal",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Prioritize(e) => e.to_string(),
            Self::MalformedBody(m) | Self::Internal(m) => m.clone(),
        }
    }
}

impl From<PrioritizeError> for ApiError {
    fn from(e: PrioritizeError) -> Self { Self::Prioritize(e) }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self::MalformedBody(rejection.body_text()) }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self { Self::Internal(format!("blocking task failed: {e}")) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody { error: self.code(),
                               message: self.message() };
        if status.is_server_error() {
            error!("api error status={} code={} message={}", status.as_u16(), body.error, body.message);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autogest_core::StoreError;

    #[test]
    fn status_and_code_mapping() {
        let cases = [(ApiError::Prioritize(PrioritizeError::InvalidInput("x".into())), 400, "invalid_input"),
                     (ApiError::Prioritize(PrioritizeError::UnknownCategory("Pesca".into())), 400, "unknown_category"),
                     (ApiError::Prioritize(PrioritizeError::ClassifierFault("nan".into())), 500, "classifier_fault"),
                     (ApiError::Prioritize(PrioritizeError::Storage(StoreError::StorageFault("disk".into()))), 500, "storage_fault"),
                     (ApiError::MalformedBody("missing field".into()), 400, "invalid_input"),
                     (ApiError::Internal("join".into()), 500, "internal")];
        for (err, status, code) in cases {
            assert_eq!(err.status().as_u16(), status, "{err:?}");
            assert_eq!(err.code(), code);
        }
    }
}
