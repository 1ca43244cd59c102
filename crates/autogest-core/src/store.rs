use std::sync::Mutex;

use autogest_domain::{NewRecord, Record};

use crate::errors::StoreError;

/// Almacenamiento append-only de registros priorizados.
///
/// Contrato:
/// - `append` asigna un id único y estrictamente creciente.
/// - `list_all` devuelve todos los registros, el más reciente primero.
/// - No existen operaciones de actualización ni borrado.
pub trait RecordStore: Send + Sync {
    fn append(&self, record: NewRecord) -> Result<Record, StoreError>;
    fn list_all(&self) -> Result<Vec<Record>, StoreError>;
}

/// Backend en memoria (tests y modo desarrollo).
#[derive(Default)]
pub struct InMemoryRecordStore {
    inner: Mutex<Vec<Record>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self { Self::default() }
}

impl RecordStore for InMemoryRecordStore {
    fn append(&self, record: NewRecord) -> Result<Record, StoreError> {
        let mut rows = self.inner.lock().map_err(|_| StoreError::StorageFault("in-memory store lock poisoned".into()))?;
        let id = rows.last().map(|r| r.id + 1).unwrap_or(1);
        let rec = record.into_record(id);
        rows.push(rec.clone());
        Ok(rec)
    }

    fn list_all(&self) -> Result<Vec<Record>, StoreError> {
        let rows = self.inner.lock().map_err(|_| StoreError::StorageFault("in-memory store lock poisoned".into()))?;
        Ok(rows.iter().rev().cloned().collect())
    }
}
