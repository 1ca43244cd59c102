//! Implementación SQLite (Diesel) de `RecordStore`.
//!
//! - Append-only: sólo `INSERT` y `SELECT`; no hay updates ni deletes.
//! - `id` es `INTEGER PRIMARY KEY AUTOINCREMENT`: único y estrictamente
//!   creciente aunque la tabla se vacíe por fuera.
//! - SQLite no admite escritores concurrentes: las escrituras se serializan
//!   con un mutex en el store y cada conexión del pool fija `busy_timeout`.
//! - Reintento corto con backoff ante "database is locked".

use std::sync::Mutex;
use std::time::Duration;

use autogest_core::{RecordStore, StoreError};
use autogest_domain::record::{format_created_at, parse_created_at};
use autogest_domain::{NewRecord, Priority, Record};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use log::{debug, error, warn};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::requests;

/// Alias de tipo para el pool r2d2 de conexiones SQLite.
///
/// Al construirlo con `build_pool` se corren las migraciones pendientes una
/// sola vez.
pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type PooledSqlite = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real o un proveedor de prueba sin acoplar el
/// store a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PooledSqlite, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `SqlitePool`.
pub struct PoolProvider {
    pub pool: SqlitePool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PooledSqlite, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Pragmas aplicados a cada conexión al salir del pool.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!("PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
                                    self.busy_timeout_ms))
            .map_err(r2d2::Error::QueryError)
    }
}

/// Fila mapeada de la tabla `requests`.
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecordRow {
    pub id: i64,
    pub citizen_id: String,
    pub document_type: String,
    pub priority: String,
    pub created_at: String,
    pub contact_email: Option<String>,
}

impl TryFrom<RecordRow> for Record {
    type Error = PersistenceError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let priority: Priority = row.priority
                                    .parse()
                                    .map_err(|e| PersistenceError::Corrupt(format!("id={}: {e}", row.id)))?;
        let created_at = parse_created_at(&row.created_at).map_err(|e| PersistenceError::Corrupt(format!("id={}: {e}", row.id)))?;
        Ok(Record { id: row.id,
                    citizen_id: row.citizen_id,
                    document_type: row.document_type,
                    priority,
                    created_at,
                    contact_email: row.contact_email })
    }
}

/// Estructura para inserción; el id lo asigna SQLite y vuelve vía `RETURNING`.
#[derive(Insertable, Debug)]
#[diesel(table_name = requests)]
pub struct NewRecordRow<'a> {
    pub citizen_id: &'a str,
    pub document_type: &'a str,
    pub priority: &'a str,
    pub created_at: &'a str,
    pub contact_email: Option<&'a str>,
}

/// Determina si un error es transitorio (recomendado reintentar con backoff).
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("database is locked") || m.contains("database table is locked") || m.contains("busy")
        }
        _ => false,
    }
}

/// Retry simple con backoff lineal muy pequeño (hasta 3 intentos extra:
/// 15ms, 30ms, 45ms). Emite `warn!` por intento.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms", attempts + 1, e, delay_ms);
                std::thread::sleep(Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Implementación SQLite de `RecordStore`.
pub struct SqliteRecordStore<P: ConnectionProvider> {
    provider: P,
    write_lock: Mutex<()>,
}

impl<P: ConnectionProvider> SqliteRecordStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider,
               write_lock: Mutex::new(()) }
    }

    fn insert(&self, record: &NewRecord) -> Result<i64, PersistenceError> {
        let created_at = format_created_at(&record.created_at);
        let row = NewRecordRow { citizen_id: &record.citizen_id,
                                 document_type: &record.document_type,
                                 priority: record.priority.label(),
                                 created_at: &created_at,
                                 contact_email: Some(&record.contact_email) };
        let _guard = self.write_lock
                         .lock()
                         .map_err(|_| PersistenceError::Unknown("write lock poisoned".into()))?;
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            let id: i64 = diesel::insert_into(requests::table).values(&row)
                                                              .returning(requests::id)
                                                              .get_result(&mut conn)?;
            Ok(id)
        })
    }

    fn load_all(&self) -> Result<Vec<Record>, PersistenceError> {
        let rows: Vec<RecordRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            requests::table.select(RecordRow::as_select())
                           .order(requests::id.desc())
                           .load(&mut conn)
                           .map_err(PersistenceError::from)
        })?;
        rows.into_iter().map(Record::try_from).collect()
    }
}

impl<P: ConnectionProvider> RecordStore for SqliteRecordStore<P> {
    fn append(&self, record: NewRecord) -> Result<Record, StoreError> {
        debug!("append:start citizen_id={} priority={}", record.citizen_id, record.priority);
        let id = self.insert(&record).map_err(|e| {
                                         error!("append:insert error citizen_id={} err={:?}", record.citizen_id, e);
                                         e
                                     })?;
        debug!("append:done id={id}");
        Ok(record.into_record(id))
    }

    fn list_all(&self) -> Result<Vec<Record>, StoreError> {
        let records = self.load_all().map_err(|e| {
                                         error!("list_all:load error err={:?}", e);
                                         e
                                     })?;
        debug!("list_all:done count={}", records.len());
        Ok(records)
    }
}

/// Construye un pool SQLite r2d2 a partir de la ruta/URL.
///
/// - `max_size = 0` se ajusta a 1.
/// - Ejecuta migraciones (base + aditivas) en el primer checkout; llamar dos
///   veces sobre la misma base es seguro.
pub fn build_pool(database_url: &str, max_size: u32, busy_timeout_ms: u32) -> Result<SqlitePool, PersistenceError> {
    let validated_max = if max_size == 0 { 1 } else { max_size };
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder().max_size(validated_max)
                                    .connection_customizer(Box::new(ConnectionPragmas { busy_timeout_ms }))
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}
