//! autogest-core: pipeline de priorización (inferencia + persistencia + aviso).
//!
//! Módulos:
//! - `classifier`: trait `Classifier`, red densa congelada y argmax estable.
//! - `encoders`: tablas congeladas tipo de trámite → código e índice → prioridad.
//! - `store`: contrato append-only `RecordStore` y backend en memoria.
//! - `notifier`: contrato best-effort `Notifier`.
//! - `service`: `PriorityService`, la única operación con efectos.
pub mod classifier;
pub mod encoders;
pub mod errors;
pub mod notifier;
pub mod service;
pub mod store;

pub use classifier::{argmax_first, Activation, Classifier, DenseLayer, DenseNetwork};
pub use encoders::Encoders;
pub use errors::{ClassifierError, EncoderError, PrioritizeError, StoreError};
pub use notifier::{Notification, NotificationFailure, Notifier};
pub use service::{PriorityResult, PriorityService, FEATURE_DIM};
pub use store::{InMemoryRecordStore, RecordStore};
