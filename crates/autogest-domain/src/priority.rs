//! Nivel de prioridad asignado a un trámite.
//!
//! En el cable (JSON, base de datos, correo) se usan las etiquetas en español
//! `Alta`/`Media`/`Baja`; al parsear se aceptan también los equivalentes en
//! inglés.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Alta", alias = "High")]
    High,
    #[serde(rename = "Media", alias = "Medium")]
    Medium,
    #[serde(rename = "Baja", alias = "Low")]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Etiqueta persistida y enviada al ciudadano.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "Alta",
            Priority::Medium => "Media",
            Priority::Low => "Baja",
        }
    }

    pub fn is_critical(&self) -> bool { matches!(self, Priority::High) }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Alta" | "High" => Ok(Priority::High),
            "Media" | "Medium" => Ok(Priority::Medium),
            "Baja" | "Low" => Ok(Priority::Low),
            other => Err(DomainError::UnknownPriority(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spanish_and_english_labels() {
        assert_eq!("Alta".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(" Baja ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("Urgente".parse::<Priority>().is_err());
    }

    #[test]
    fn serializes_with_wire_label() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"Alta\"");
        let p: Priority = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }
}
