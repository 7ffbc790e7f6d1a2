// history.rs
use crate::{DomainError, MoleculeRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Tope fijo de entradas que devuelve `recent`, pida lo que pida el caller.
pub const MAX_RECENT: i64 = 10;

/// Fila persistida del historial de búsquedas.
///
/// Log de solo-agregado: búsquedas repetidas crean filas repetidas, sin
/// deduplicación ni camino de actualización o borrado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub id: String,
  pub compound_name: String,
  pub cid: i64,
  pub formula: String,
  pub smiles: String,
  pub molecular_weight: Option<f64>,
  pub molblock: Option<String>,
  pub logp: Option<f64>,
  pub tpsa: Option<f64>,
  /// Época en microsegundos, asignada por el store al insertar.
  pub searched_at_ts: i64,
}

impl HistoryEntry {
  pub fn searched_at(&self) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(self.searched_at_ts).unwrap_or_else(Utc::now)
  }
}

/// DTO de inserción: el `id` y el timestamp los asigna el store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryEntry {
  pub compound_name: String,
  pub cid: i64,
  pub formula: String,
  pub smiles: String,
  pub molecular_weight: Option<f64>,
  pub molblock: Option<String>,
  pub logp: Option<f64>,
  pub tpsa: Option<f64>,
}

impl NewHistoryEntry {
  /// Construye la entrada a partir de un registro ya mostrado al usuario.
  /// Los campos textuales no disponibles se guardan como 'N/A' (igual que
  /// la vista); el peso no disponible queda NULL.
  pub fn from_record(compound_name: &str, record: &MoleculeRecord) -> Self {
    Self { compound_name: compound_name.to_string(),
           cid: record.cid(),
           formula: record.formula().to_string(),
           smiles: record.smiles().to_string(),
           molecular_weight: record.weight().value().copied(),
           molblock: record.molblock().value().cloned(),
           logp: record.descriptors().logp,
           tpsa: record.descriptors().tpsa }
  }
}

/// Contrato de persistencia del historial.
///
/// `append` es best-effort desde la perspectiva del caller: un fallo se
/// reporta al canal del operador (log) y nunca bloquea la respuesta
/// principal. `recent` devuelve entradas ordenadas por recencia, la más
/// nueva primero.
pub trait HistoryStore: Send + Sync {
  /// Agrega una entrada y devuelve el id asignado.
  fn append(&self, entry: NewHistoryEntry) -> Result<String, DomainError>;

  /// Últimas entradas, más reciente primero, nunca más de `MAX_RECENT`.
  fn recent(&self, limit: i64) -> Result<Vec<HistoryEntry>, DomainError>;
}

/// Implementación en memoria para tests y ejecución sin base de datos.
pub struct InMemoryHistoryStore {
  rows: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl InMemoryHistoryStore {
  pub fn new() -> Self {
    Self { rows: Arc::new(Mutex::new(Vec::new())) }
  }

  fn lock_rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<HistoryEntry>>, DomainError> {
    self.rows
        .lock()
        .map_err(|e| DomainError::External(format!("Mutex 'rows' poisoned: {}", e)))
  }
}

impl Default for InMemoryHistoryStore {
  fn default() -> Self {
    Self::new()
  }
}

impl HistoryStore for InMemoryHistoryStore {
  fn append(&self, entry: NewHistoryEntry) -> Result<String, DomainError> {
    let id = Uuid::new_v4().to_string();
    let row = HistoryEntry { id: id.clone(),
                             compound_name: entry.compound_name,
                             cid: entry.cid,
                             formula: entry.formula,
                             smiles: entry.smiles,
                             molecular_weight: entry.molecular_weight,
                             molblock: entry.molblock,
                             logp: entry.logp,
                             tpsa: entry.tpsa,
                             searched_at_ts: Utc::now().timestamp_micros() };
    self.lock_rows()?.push(row);
    Ok(id)
  }

  fn recent(&self, limit: i64) -> Result<Vec<HistoryEntry>, DomainError> {
    let cap = limit.clamp(0, MAX_RECENT) as usize;
    let rows = self.lock_rows()?;
    Ok(rows.iter().rev().take(cap).cloned().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Field;

  fn entry(name: &str, cid: i64) -> NewHistoryEntry {
    NewHistoryEntry { compound_name: name.into(),
                      cid,
                      formula: "C9H8O4".into(),
                      smiles: "CC(=O)OC1=CC=CC=C1C(=O)O".into(),
                      molecular_weight: Some(180.16),
                      molblock: None,
                      logp: None,
                      tpsa: None }
  }

  #[test]
  fn append_then_recent_returns_newest_first() {
    let store = InMemoryHistoryStore::new();
    store.append(entry("aspirin", 2244)).unwrap();
    store.append(entry("caffeine", 2519)).unwrap();
    let rows = store.recent(10).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].compound_name, "caffeine");
    assert_eq!(rows[1].compound_name, "aspirin");
  }

  #[test]
  fn recent_never_exceeds_the_fixed_cap() {
    let store = InMemoryHistoryStore::new();
    for i in 0..15 {
      store.append(entry(&format!("mol-{}", i), i + 1)).unwrap();
    }
    assert_eq!(store.recent(10).unwrap().len(), 10);
    // Incluso si el caller pide más, el tope fijo manda.
    assert_eq!(store.recent(100).unwrap().len(), 10);
    assert_eq!(store.recent(3).unwrap().len(), 3);
    assert_eq!(store.recent(0).unwrap().len(), 0);
  }

  #[test]
  fn repeated_searches_create_repeated_rows() {
    let store = InMemoryHistoryStore::new();
    store.append(entry("aspirin", 2244)).unwrap();
    store.append(entry("aspirin", 2244)).unwrap();
    assert_eq!(store.recent(10).unwrap().len(), 2);
  }

  #[test]
  fn from_record_degrades_missing_fields() {
    let record = MoleculeRecord::new(2244,
                                     Field::Value("C9H8O4".into()),
                                     Field::Unavailable,
                                     Field::Unavailable,
                                     Field::Unavailable,
                                     Field::Unavailable).unwrap();
    let e = NewHistoryEntry::from_record("aspirin", &record);
    assert_eq!(e.cid, 2244);
    assert_eq!(e.formula, "C9H8O4");
    assert_eq!(e.smiles, "N/A");
    assert_eq!(e.molecular_weight, None);
    assert_eq!(e.molblock, None);
  }
}
