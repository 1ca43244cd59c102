//! Carga de configuración de conexión desde variables de entorno.
//! Usa convención `DATABASE_URL` (ruta del archivo SQLite) y parámetros
//! opcionales de pool.

use once_cell::sync::Lazy;
use dotenvy::dotenv;

use crate::error::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_DATABASE_URL: &str = "tramites.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self { url: DEFAULT_DATABASE_URL.to_string(),
               max_connections: 4,
               busy_timeout_ms: 5_000 }
    }
}

impl DbConfig {
    /// Lee `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS` y
    /// `DATABASE_BUSY_TIMEOUT_MS` de `lookup`; lo ausente toma el default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PersistenceError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        let url = lookup("DATABASE_URL").map(|v| v.trim().to_string())
                                        .filter(|v| !v.is_empty())
                                        .unwrap_or(defaults.url);
        let max_connections = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?.unwrap_or(defaults.max_connections);
        let busy_timeout_ms = parse_var(&lookup, "DATABASE_BUSY_TIMEOUT_MS")?.unwrap_or(defaults.busy_timeout_ms);
        Ok(Self { url, max_connections, busy_timeout_ms })
    }
}

fn parse_var<F>(lookup: &F, name: &str) -> Result<Option<u32>, PersistenceError>
    where F: Fn(&str) -> Option<String>
{
    match lookup(name).filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => raw.trim()
                        .parse()
                        .map(Some)
                        .map_err(|_| PersistenceError::Config(format!("{name} no es un entero válido: {raw}"))),
        None => Ok(None),
    }
}

/// Carga `.env` una sola vez; llamadas posteriores no hacen nada.
pub fn init_dotenv() { Lazy::force(&DOTENV_LOADED); }

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(DbConfig::from_lookup(lookup(&[])).unwrap(), DbConfig::default());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "/tmp/x.db"), ("DATABASE_BUSY_TIMEOUT_MS", "250")])).unwrap();
        assert_eq!(cfg.url, "/tmp/x.db");
        assert_eq!(cfg.busy_timeout_ms, 250);
        assert_eq!(cfg.max_connections, 4);
    }

    #[test]
    fn non_numeric_pool_size_is_a_config_error() {
        let err = DbConfig::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", "muchas")])).unwrap_err();
        assert!(matches!(err, PersistenceError::Config(ref m) if m.contains("DATABASE_MAX_CONNECTIONS")));
    }
}
