//! Migraciones de esquema.
//!
//! Dos fases, ambas idempotentes:
//! 1. Migraciones Diesel embebidas (tabla base). Diesel registra las
//!    aplicadas en `__diesel_schema_migrations`.
//! 2. Columnas aditivas: `ALTER TABLE ... ADD COLUMN` sólo si la columna no
//!    existe. Una carrera con otro proceso que la agregue primero se tolera.
//!
//! El esquema sólo evoluciona agregando columnas opcionales.

use diesel::connection::SimpleConnection;
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;
use diesel::{QueryableByName, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};

use crate::error::PersistenceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Columna opcional agregada después de la creación de la tabla.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdditiveColumn {
    pub table: &'static str,
    pub name: &'static str,
    pub sql_type: &'static str,
}

pub const ADDITIVE_COLUMNS: &[AdditiveColumn] = &[AdditiveColumn { table: "requests",
                                                                   name: "contact_email",
                                                                   sql_type: "TEXT" }];

#[derive(QueryableByName, Debug)]
struct TableColumn {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Corre migraciones embebidas y luego las columnas aditivas.
pub fn run_pending_migrations(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let applied = conn.run_pending_migrations(MIGRATIONS)
                      .map_err(|e| PersistenceError::Migration(e.to_string()))?;
    for version in &applied {
        info!("migration applied version={version}");
    }
    apply_additive_columns(conn, ADDITIVE_COLUMNS)?;
    Ok(())
}

/// Devuelve cuántas columnas se agregaron en esta llamada.
pub fn apply_additive_columns(conn: &mut SqliteConnection, columns: &[AdditiveColumn]) -> Result<usize, PersistenceError> {
    let mut added = 0;
    for col in columns {
        if column_exists(conn, col.table, col.name)? {
            debug!("additive column present table={} column={}", col.table, col.name);
            continue;
        }
        let stmt = format!("ALTER TABLE {} ADD COLUMN {} {}", col.table, col.name, col.sql_type);
        match conn.batch_execute(&stmt) {
            Ok(()) => {
                info!("additive column added table={} column={}", col.table, col.name);
                added += 1;
            }
            Err(e) if e.to_string().contains("duplicate column name") => {
                debug!("additive column raced table={} column={}", col.table, col.name);
            }
            Err(e) => return Err(PersistenceError::Migration(format!("{stmt}: {e}"))),
        }
    }
    Ok(added)
}

/// Nombres de columnas de una tabla según `PRAGMA table_info`.
pub fn table_columns(conn: &mut SqliteConnection, table: &str) -> Result<Vec<String>, PersistenceError> {
    if !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PersistenceError::Migration(format!("nombre de tabla inseguro: {table}")));
    }
    let rows: Vec<TableColumn> = diesel::sql_query(format!("PRAGMA table_info({table})")).load(conn)?;
    Ok(rows.into_iter().map(|r| r.name).collect())
}

fn column_exists(conn: &mut SqliteConnection, table: &str, column: &str) -> Result<bool, PersistenceError> {
    Ok(table_columns(conn, table)?.iter().any(|c| c.eq_ignore_ascii_case(column)))
}
