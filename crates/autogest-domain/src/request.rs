//! Solicitud de trámite enviada por el ciudadano.
//!
//! La solicitud es inmutable y nunca se persiste tal cual; sólo sus campos
//! derivados terminan en un `Record`.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::DomainError;

/// Categorías fijas de trámite que ofrece el formulario municipal.
pub const DOCUMENT_TYPES: [&str; 6] = ["Licencia de Construcción",
                                       "Habilitación Urbana",
                                       "Matrimonio Civil",
                                       "Solicitud Simple",
                                       "Estudio de Impacto Vial",
                                       "Emergencia Médica"];

pub const ESTIMATED_DAYS_RANGE: RangeInclusive<i64> = 1..=30;
pub const PRIOR_ERRORS_RANGE: RangeInclusive<i64> = 0..=2;

/// Campos de entrada. Los alias mantienen compatibilidad con los nombres del
/// formulario original (`dni`, `tipo_tramite`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(alias = "dni")]
    pub citizen_id: String,
    #[serde(alias = "tipo_tramite")]
    pub document_type: String,
    #[serde(alias = "tiempo_estimado")]
    pub estimated_days: i64,
    #[serde(alias = "errores_previos")]
    pub prior_errors: i64,
    #[serde(alias = "email")]
    pub contact_email: String,
}

impl SubmitRequest {
    /// Validación estructural mínima. La pertenencia de `document_type` al
    /// vocabulario entrenado NO se valida aquí: la decide el encoder.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.citizen_id.trim().is_empty() {
            return Err(DomainError::ValidationError("citizen_id es obligatorio".into()));
        }
        let email = self.contact_email.trim();
        if email.is_empty() {
            return Err(DomainError::ValidationError("contact_email es obligatorio".into()));
        }
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(DomainError::ValidationError(format!("contact_email inválido: {email}")));
        }
        if self.document_type.trim().is_empty() {
            return Err(DomainError::ValidationError("document_type es obligatorio".into()));
        }
        if !ESTIMATED_DAYS_RANGE.contains(&self.estimated_days) {
            return Err(DomainError::ValidationError(format!("estimated_days fuera de rango {}..={}: {}",
                                                            ESTIMATED_DAYS_RANGE.start(),
                                                            ESTIMATED_DAYS_RANGE.end(),
                                                            self.estimated_days)));
        }
        if !PRIOR_ERRORS_RANGE.contains(&self.prior_errors) {
            return Err(DomainError::ValidationError(format!("prior_errors fuera de rango {}..={}: {}",
                                                            PRIOR_ERRORS_RANGE.start(),
                                                            PRIOR_ERRORS_RANGE.end(),
                                                            self.prior_errors)));
        }
        Ok(())
    }
}
