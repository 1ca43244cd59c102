//! Aviso al ciudadano (best-effort, at-most-once).

use autogest_domain::Priority;
use thiserror::Error;

/// Contenido mínimo de un aviso.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub priority: Priority,
    pub document_type: String,
    pub citizen_id: String,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NotificationFailure {
    #[error("notifier disabled (no mail relay configured)")]
    Disabled,
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("could not build message: {0}")]
    Message(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Un fallo nunca es fatal para quien llama: se registra y se descarta.
/// Sin reintentos ni cola.
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<(), NotificationFailure>;

    /// `false` cuando el notifier descarta todo de antemano.
    fn is_enabled(&self) -> bool { true }
}
