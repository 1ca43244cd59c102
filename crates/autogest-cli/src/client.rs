//! Cliente HTTP bloqueante contra `autogest-server`.
//!
//! Separa tres situaciones que el operador debe poder distinguir: servidor
//! inalcanzable, solicitud rechazada (4xx) y fallo del servidor (5xx).

use std::time::Duration;

use autogest_domain::{HistorySummary, Priority, Record, SubmitRequest};
use log::{debug, error};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no se pudo inicializar el cliente HTTP: {0}")]
    Setup(String),
    #[error("no se pudo contactar al servidor en {url}: {reason}. Inicie autogest-server e intente de nuevo")]
    Unreachable { url: String, reason: String },
    #[error("solicitud rechazada ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("error del servidor ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("respuesta ilegible: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Setup(_) => 1,
            Self::Rejected { .. } => 2,
            Self::Unreachable { .. } => 3,
            Self::Server { .. } | Self::Decode(_) => 4,
        }
    }
}

/// Respuesta de `POST /predecir`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PredictResponse {
    pub prioridad: Priority,
    pub record_id: i64,
    pub notified: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout)
                                    .build()
                                    .map_err(|e| ClientError::Setup(e.to_string()))?;
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(),
                  http })
    }

    fn url(&self, path: &str) -> String { format!("{}{path}", self.base_url) }

    fn unreachable(&self, url: String, e: reqwest::Error) -> ClientError {
        error!("request failed url={url} connect={} timeout={} err={e}", e.is_connect(), e.is_timeout());
        ClientError::Unreachable { url,
                                   reason: e.to_string() }
    }

    pub fn submit(&self, request: &SubmitRequest) -> Result<PredictResponse, ClientError> {
        let url = self.url("/predecir");
        debug!("POST {url}");
        let resp = self.http.post(&url).json(request).send().map_err(|e| self.unreachable(url, e))?;
        decode(resp)
    }

    pub fn history(&self) -> Result<Vec<Record>, ClientError> {
        let url = self.url("/records");
        debug!("GET {url}");
        let resp = self.http.get(&url).send().map_err(|e| self.unreachable(url, e))?;
        decode(resp)
    }

    pub fn summary(&self) -> Result<HistorySummary, ClientError> {
        let url = self.url("/records/summary");
        debug!("GET {url}");
        let resp = self.http.get(&url).send().map_err(|e| self.unreachable(url, e))?;
        decode(resp)
    }
}

fn decode<T>(resp: Response) -> Result<T, ClientError>
    where T: DeserializeOwned
{
    let status = resp.status();
    if status.is_success() {
        return resp.json::<T>().map_err(|e| ClientError::Decode(e.to_string()));
    }
    let body = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body).map(|b| b.message).unwrap_or(body);
    if status.is_client_error() {
        Err(ClientError::Rejected { status: status.as_u16(),
                                    message })
    } else {
        Err(ClientError::Server { status: status.as_u16(),
                                  message })
    }
}
