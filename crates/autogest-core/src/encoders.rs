//! Encoders congelados del modelo.
//!
//! - Tipo de trámite → código numérico (posición en el vocabulario entrenado).
//! - Índice de clase → etiqueta de prioridad.
//!
//! El orden de ambos vocabularios es el del entrenamiento; aquí no se
//! reconstruye ni se reordena nada.

use autogest_domain::Priority;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::EncoderError;

/// Forma serializada de las tablas (`encoders.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderTables {
    pub document_types: Vec<String>,
    pub priorities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoders {
    document_types: IndexMap<String, u32>,
    priorities: Vec<Priority>,
}

impl Encoders {
    pub fn from_tables(tables: EncoderTables) -> Result<Self, EncoderError> {
        let mut document_types = IndexMap::with_capacity(tables.document_types.len());
        for (code, name) in tables.document_types.into_iter().enumerate() {
            if name.trim().is_empty() {
                return Err(EncoderError::Invalid(format!("empty document type at position {code}")));
            }
            if document_types.insert(name.clone(), code as u32).is_some() {
                return Err(EncoderError::Invalid(format!("duplicate document type: {name}")));
            }
        }
        if document_types.is_empty() {
            return Err(EncoderError::Invalid("document type vocabulary is empty".into()));
        }
        let priorities = tables.priorities
                               .iter()
                               .map(|label| label.parse::<Priority>().map_err(|e| EncoderError::Invalid(e.to_string())))
                               .collect::<Result<Vec<_>, _>>()?;
        if priorities.is_empty() {
            return Err(EncoderError::Invalid("priority vocabulary is empty".into()));
        }
        Ok(Self { document_types, priorities })
    }

    /// Tablas equivalentes a un `LabelEncoder` ajustado sobre las categorías
    /// fijas del formulario (orden alfabético).
    pub fn municipal_default() -> Self {
        let mut document_types: Vec<&str> = autogest_domain::DOCUMENT_TYPES.to_vec();
        document_types.sort_unstable();
        let mut priorities = Priority::ALL.map(|p| p.label()).to_vec();
        priorities.sort_unstable();
        let document_types = document_types.into_iter()
                                           .enumerate()
                                           .map(|(code, name)| (name.to_string(), code as u32))
                                           .collect();
        let priorities = priorities.into_iter().filter_map(|l| l.parse().ok()).collect();
        Self { document_types, priorities }
    }

    pub fn encode_document_type(&self, document_type: &str) -> Result<u32, EncoderError> {
        self.document_types
            .get(document_type.trim())
            .copied()
            .ok_or_else(|| EncoderError::UnknownCategory(document_type.to_string()))
    }

    pub fn decode_priority(&self, class_index: usize) -> Result<Priority, EncoderError> {
        self.priorities.get(class_index).copied().ok_or(EncoderError::UnknownIndex(class_index))
    }

    pub fn priority_count(&self) -> usize { self.priorities.len() }

    pub fn document_types(&self) -> impl Iterator<Item = &str> { self.document_types.keys().map(String::as_str) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_follow_sorted_vocabulary() {
        let enc = Encoders::municipal_default();
        assert_eq!(enc.encode_document_type("Emergencia Médica").unwrap(), 0);
        assert_eq!(enc.encode_document_type("Solicitud Simple").unwrap(), 5);
        assert_eq!(enc.decode_priority(0).unwrap(), Priority::High);
        assert_eq!(enc.decode_priority(1).unwrap(), Priority::Low);
        assert_eq!(enc.decode_priority(2).unwrap(), Priority::Medium);
        assert_eq!(enc.priority_count(), 3);
        assert_eq!(enc.document_types().count(), 6);
    }

    #[test]
    fn unknown_category_and_index() {
        let enc = Encoders::municipal_default();
        assert_eq!(enc.encode_document_type("Licencia de Pesca"),
                   Err(EncoderError::UnknownCategory("Licencia de Pesca".into())));
        assert_eq!(enc.decode_priority(3), Err(EncoderError::UnknownIndex(3)));
    }

    #[test]
    fn tables_reject_duplicates_and_bad_labels() {
        let dup = EncoderTables { document_types: vec!["A".into(), "A".into()],
                                  priorities: vec!["Alta".into()] };
        assert!(Encoders::from_tables(dup).is_err());
        let bad = EncoderTables { document_types: vec!["A".into()],
                                  priorities: vec!["Urgente".into()] };
        assert!(Encoders::from_tables(bad).is_err());
    }
}
