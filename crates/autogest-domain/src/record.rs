//! Registro persistido de un trámite priorizado.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{DomainError, Priority};

/// Formato de `created_at` en base de datos y en el cable (precisión minuto).
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Fila inmutable del historial. Sólo el Record Store la crea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub citizen_id: String,
    pub document_type: String,
    pub priority: Priority,
    #[serde(with = "minute_format")]
    pub created_at: NaiveDateTime,
    /// Puede faltar en filas anteriores a la columna aditiva.
    pub contact_email: Option<String>,
}

/// Datos de un registro aún sin id asignado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub citizen_id: String,
    pub document_type: String,
    pub priority: Priority,
    pub created_at: NaiveDateTime,
    pub contact_email: String,
}

impl NewRecord {
    /// Trunca el timestamp a minutos para que memoria y disco coincidan.
    pub fn new(citizen_id: &str, document_type: &str, priority: Priority, created_at: NaiveDateTime, contact_email: &str) -> Self {
        Self { citizen_id: citizen_id.trim().to_string(),
               document_type: document_type.trim().to_string(),
               priority,
               created_at: truncate_to_minute(created_at),
               contact_email: contact_email.trim().to_string() }
    }

    pub fn into_record(self, id: i64) -> Record {
        Record { id,
                 citizen_id: self.citizen_id,
                 document_type: self.document_type,
                 priority: self.priority,
                 created_at: self.created_at,
                 contact_email: Some(self.contact_email) }
    }
}

pub fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(ts)
}

pub fn format_created_at(ts: &NaiveDateTime) -> String { ts.format(CREATED_AT_FORMAT).to_string() }

pub fn parse_created_at(raw: &str) -> Result<NaiveDateTime, DomainError> {
    NaiveDateTime::parse_from_str(raw.trim(), CREATED_AT_FORMAT).map_err(|e| DomainError::InvalidTimestamp(format!("{raw}: {e}")))
}

/// Métricas del panel de historial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total: usize,
    /// Registros con prioridad Alta.
    pub critical: usize,
    /// Registros creados en la fecha consultada.
    pub today: usize,
}

impl HistorySummary {
    pub fn from_records(records: &[Record], today: NaiveDate) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
                          acc.total += 1;
                          if r.priority.is_critical() {
                              acc.critical += 1;
                          }
                          if r.created_at.date() == today {
                              acc.today += 1;
                          }
                          acc
                      })
    }
}

mod minute_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.serialize_str(&super::format_created_at(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
        where D: Deserializer<'de>
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_created_at(&raw).map_err(serde::de::Error::custom)
    }
}
