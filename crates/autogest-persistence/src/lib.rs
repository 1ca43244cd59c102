//! autogest-persistence
//!
//! Implementación SQLite (Diesel + r2d2) del `RecordStore` del core.
//!
//! Módulos:
//! - `sqlite`: pool, proveedor de conexiones y `SqliteRecordStore`.
//! - `migrations`: migraciones embebidas + columnas aditivas idempotentes.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use sqlite::{build_pool, ConnectionProvider, PoolProvider, SqlitePool, SqliteRecordStore};
