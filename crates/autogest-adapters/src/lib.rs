//! autogest-adapters: integración con el exterior.
//!
//! - `artifacts`: carga del modelo pre-entrenado y de los encoders desde
//!   disco, con fingerprint SHA-256 del modelo.
//! - `mail`: `Notifier` SMTP (lettre) y su variante deshabilitada.

pub mod artifacts;
pub mod mail;

pub use artifacts::{load_artifacts, ArtifactError, LoadedArtifacts, ModelArtifact};
pub use mail::{render_html, DisabledNotifier, MailConfig, SmtpNotifier, SUBJECT};
