//! Errores del pipeline de priorización.

use autogest_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ClassifierError {
    #[error("feature vector has {got} values, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("invalid model shape: {0}")]
    InvalidShape(String),
    #[error("model produced a non-finite output")]
    NonFinite,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncoderError {
    #[error("unknown document type: {0}")]
    UnknownCategory(String),
    #[error("class index {0} has no priority label")]
    UnknownIndex(usize),
    #[error("invalid encoder table: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    #[error("storage fault: {0}")]
    StorageFault(String),
}

/// Fallos visibles para quien invoca `PriorityService::prioritize`.
///
/// `InvalidInput` y `UnknownCategory` son errores del cliente; el resto son
/// fallos del servidor. Los fallos de notificación nunca llegan aquí.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum PrioritizeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown document type: {0}")]
    UnknownCategory(String),
    #[error("classifier fault: {0}")]
    ClassifierFault(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl PrioritizeError {
    pub fn is_client_error(&self) -> bool { matches!(self, Self::InvalidInput(_) | Self::UnknownCategory(_)) }
}

impl From<DomainError> for PrioritizeError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::ValidationError(msg) => Self::InvalidInput(msg),
            other => Self::InvalidInput(other.to_string()),
        }
    }
}

impl From<ClassifierError> for PrioritizeError {
    fn from(e: ClassifierError) -> Self { Self::ClassifierFault(e.to_string()) }
}

impl From<EncoderError> for PrioritizeError {
    fn from(e: EncoderError) -> Self {
        match e {
            EncoderError::UnknownCategory(c) => Self::UnknownCategory(c),
            other => Self::ClassifierFault(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(PrioritizeError::InvalidInput("x".into()).is_client_error());
        assert!(PrioritizeError::UnknownCategory("x".into()).is_client_error());
        assert!(!PrioritizeError::ClassifierFault("x".into()).is_client_error());
        assert!(!PrioritizeError::Storage(StoreError::StorageFault("x".into())).is_client_error());
    }

    #[test]
    fn encoder_unknown_index_is_a_server_fault() {
        let e: PrioritizeError = EncoderError::UnknownIndex(5).into();
        assert!(matches!(e, PrioritizeError::ClassifierFault(_)));
        let e: PrioritizeError = EncoderError::UnknownCategory("Pesca".into()).into();
        assert_eq!(e, PrioritizeError::UnknownCategory("Pesca".into()));
    }
}
