use thiserror::Error;

/// Errores del dominio de trámites.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Error de validación: {0}")]
    ValidationError(String),
    #[error("Prioridad desconocida: {0}")]
    UnknownPriority(String),
    #[error("Fecha inválida: {0}")]
    InvalidTimestamp(String),
}
