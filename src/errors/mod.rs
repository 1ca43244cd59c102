//! Errores del binario servidor.
//!
//! - `AppError`: fallos de arranque; abortan el proceso con código distinto de 0.
//! - `ApiError`: fallos por petición, traducidos a respuestas HTTP.
pub mod api_error;

pub use api_error::ApiError;

use autogest_adapters::ArtifactError;
use autogest_core::NotificationFailure;
use autogest_persistence::PersistenceError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(#[from] ConfigError),
    #[error("Error de base de datos: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Error cargando artifacts: {0}")]
    Artifacts(#[from] ArtifactError),
    #[error("Error configurando correo: {0}")]
    Mail(#[from] NotificationFailure),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Mail(_) => 2,
            Self::Persistence(_) => 3,
            Self::Artifacts(_) => 4,
            Self::Io(_) => 5,
        }
    }
}
