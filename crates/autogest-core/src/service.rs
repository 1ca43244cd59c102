//! Servicio de priorización.
//!
//! Secuencia lineal por solicitud:
//! 1. validación estructural,
//! 2. codificación del tipo de trámite,
//! 3. inferencia (una llamada) y argmax con desempate por índice menor,
//! 4. decodificación de la prioridad,
//! 5. append del `Record`,
//! 6. aviso best-effort.
//!
//! Si algo falla antes del paso 5 no hay efectos secundarios. Un fallo de
//! aviso se registra y no altera el resultado.

use std::sync::Arc;

use autogest_domain::{HistorySummary, NewRecord, Priority, Record, SubmitRequest};
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::{debug, error, info, warn};

use crate::classifier::{argmax_first, Classifier};
use crate::encoders::Encoders;
use crate::errors::{ClassifierError, PrioritizeError};
use crate::notifier::{Notification, NotificationFailure, Notifier};
use crate::store::RecordStore;

/// `[type_code, estimated_days, prior_errors]`
pub const FEATURE_DIM: usize = 3;

/// Resultado síncrono de una solicitud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityResult {
    pub priority: Priority,
    pub record_id: i64,
    pub notified: bool,
}

/// Handle inmutable construido una vez al arrancar e inyectado donde se use.
pub struct PriorityService {
    classifier: Arc<dyn Classifier>,
    encoders: Arc<Encoders>,
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl PriorityService {
    pub fn new(classifier: Arc<dyn Classifier>, encoders: Arc<Encoders>, store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { classifier,
               encoders,
               store,
               notifier }
    }

    pub fn notifier_enabled(&self) -> bool { self.notifier.is_enabled() }

    /// Prioriza usando la hora local actual.
    pub fn prioritize(&self, request: &SubmitRequest) -> Result<PriorityResult, PrioritizeError> {
        self.prioritize_at(request, Local::now().naive_local())
    }

    pub fn prioritize_at(&self, request: &SubmitRequest, now: NaiveDateTime) -> Result<PriorityResult, PrioritizeError> {
        request.validate()?;
        let priority = self.classify(request)?;

        let record = self.store
                         .append(NewRecord::new(&request.citizen_id,
                                                &request.document_type,
                                                priority,
                                                now,
                                                &request.contact_email))
                         .map_err(|e| {
                             error!("prioritize:append failed citizen_id={} err={e}", request.citizen_id);
                             e
                         })?;
        info!("prioritize:stored id={} document_type={} priority={}",
              record.id,
              record.document_type,
              record.priority);

        let notification = Notification { recipient: request.contact_email.trim().to_string(),
                                           priority,
                                           document_type: record.document_type.clone(),
                                           citizen_id: record.citizen_id.clone() };
        let notified = match self.notifier.send(&notification) {
            Ok(()) => {
                debug!("prioritize:notified id={} recipient={}", record.id, notification.recipient);
                true
            }
            Err(NotificationFailure::Disabled) => {
                info!("prioritize:notification skipped id={} (notifier disabled)", record.id);
                false
            }
            Err(e) => {
                warn!("prioritize:notification failed id={} recipient={} err={e}",
                      record.id,
                      notification.recipient);
                false
            }
        };

        Ok(PriorityResult { priority,
                            record_id: record.id,
                            notified })
    }

    /// Inferencia pura, sin efectos.
    pub fn classify(&self, request: &SubmitRequest) -> Result<Priority, PrioritizeError> {
        let type_code = self.encoders.encode_document_type(&request.document_type)?;
        let features = [type_code as f32, request.estimated_days as f32, request.prior_errors as f32];
        let probs = self.classifier.predict_proba(&features)?;
        if probs.len() != self.encoders.priority_count() {
            return Err(ClassifierError::InvalidShape(format!("model returned {} classes, encoder knows {}",
                                                             probs.len(),
                                                             self.encoders.priority_count())).into());
        }
        let class_index = argmax_first(&probs).ok_or(ClassifierError::NonFinite)?;
        debug!("classify:features={features:?} probs={probs:?} class={class_index}");
        Ok(self.encoders.decode_priority(class_index)?)
    }

    /// Historial completo, el más reciente primero.
    pub fn history(&self) -> Result<Vec<Record>, PrioritizeError> {
        self.store.list_all().map_err(|e| {
                                  error!("history:list_all failed err={e}");
                                  e.into()
                              })
    }

    pub fn summary(&self, today: NaiveDate) -> Result<HistorySummary, PrioritizeError> {
        let records = self.history()?;
        Ok(HistorySummary::from_records(&records, today))
    }
}
