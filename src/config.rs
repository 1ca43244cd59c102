//! Configuración central del servidor.
//! Carga variables de entorno (.env) una sola vez y produce un `AppConfig`
//! inmutable que `main` inyecta en el resto de componentes.
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use autogest_adapters::MailConfig;
use autogest_persistence::{init_dotenv, DbConfig};
use thiserror::Error;

pub const DEFAULT_MODEL_PATH: &str = "artifacts/modelo_prioridad.json";
pub const DEFAULT_ENCODERS_PATH: &str = "artifacts/encoders.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Valor inválido para {var}: {value}")]
    Invalid { var: &'static str, value: String },
    #[error("Configuración de base de datos inválida: {0}")]
    Database(String),
    #[error("Falta la variable {0}")]
    Missing(&'static str),
}

/// Configuración global de la aplicación.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub database: DbConfig,
    pub model_path: PathBuf,
    pub encoders_path: PathBuf,
    /// `None` cuando no hay `SMTP_HOST`: avisos deshabilitados.
    pub mail: Option<MailConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        init_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construye la configuración a partir de una fuente arbitraria de
    /// variables (el entorno del proceso en producción).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let bind = parse_or(&lookup, "AUTOGEST_BIND", SocketAddr::from(([127, 0, 0, 1], 5000)))?;
        let database = DbConfig::from_lookup(&lookup).map_err(|e| ConfigError::Database(e.to_string()))?;
        let model_path = lookup("MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.into()).into();
        let encoders_path = lookup("ENCODERS_PATH").unwrap_or_else(|| DEFAULT_ENCODERS_PATH.into()).into();
        let mail = match non_empty(&lookup, "SMTP_HOST") {
            None => None,
            Some(host) => {
                let from = non_empty(&lookup, "MAIL_FROM").ok_or(ConfigError::Missing("MAIL_FROM"))?;
                Some(MailConfig { host,
                                  port: parse_or(&lookup, "SMTP_PORT", 587)?,
                                  username: non_empty(&lookup, "SMTP_USERNAME"),
                                  password: lookup("SMTP_PASSWORD"),
                                  from,
                                  starttls: parse_or(&lookup, "SMTP_STARTTLS", true)?,
                                  timeout: Duration::from_secs(parse_or(&lookup, "SMTP_TIMEOUT_SECS", 10)?) })
            }
        };
        Ok(Self { bind,
                  database,
                  model_path,
                  encoders_path,
                  mail })
    }
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
    where F: Fn(&str) -> Option<String>
{
    lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
    where F: Fn(&str) -> Option<String>,
          T: FromStr
{
    match non_empty(lookup, var) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind.to_string(), "127.0.0.1:5000");
        assert_eq!(cfg.database, DbConfig::default());
        assert_eq!(cfg.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert!(cfg.mail.is_none());
    }

    #[test]
    fn smtp_section_requires_sender() {
        assert_eq!(config(&[("SMTP_HOST", "smtp.yau.gob.pe")]).unwrap_err(),
                   ConfigError::Missing("MAIL_FROM"));
        let cfg = config(&[("SMTP_HOST", "smtp.yau.gob.pe"),
                           ("MAIL_FROM", "noreply@yau.gob.pe"),
                           ("SMTP_STARTTLS", "false"),
                           ("SMTP_TIMEOUT_SECS", "3")]).unwrap();
        let mail = cfg.mail.unwrap();
        assert_eq!(mail.port, 587);
        assert!(!mail.starttls);
        assert_eq!(mail.timeout, Duration::from_secs(3));
        assert_eq!(mail.username, None);
    }

    #[test]
    fn unparseable_values_are_errors() {
        assert!(matches!(config(&[("DATABASE_MAX_CONNECTIONS", "muchas")]), Err(ConfigError::Database(_))));
        assert!(matches!(config(&[("AUTOGEST_BIND", "localhost")]), Err(ConfigError::Invalid { .. })));
    }
}
