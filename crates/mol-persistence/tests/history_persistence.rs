// Pruebas sobre el backend SQLite; con `pg` activo el archivo entero se
// omite (el backend Postgres requiere un servidor real).
#![cfg(not(feature = "pg"))]

use mol_domain::{HistoryStore, NewHistoryEntry};
use mol_persistence::new_sqlite_for_test;
use uuid::Uuid;

fn entry(name: &str, cid: i64) -> NewHistoryEntry {
  NewHistoryEntry { compound_name: name.into(),
                    cid,
                    formula: "C8H10N4O2".into(),
                    smiles: "CN1C=NC2=C1C(=O)N(C(=O)N2C)C".into(),
                    molecular_weight: Some(194.19),
                    molblock: None,
                    logp: Some(-0.07),
                    tpsa: Some(58.4) }
}

fn temp_db_path() -> std::path::PathBuf {
  std::env::temp_dir().join(format!("molvista_test_{}.db", Uuid::new_v4()))
}

#[test]
fn diesel_history_append_and_recent_ordering() {
  let tmp_path = temp_db_path();
  let store = new_sqlite_for_test(tmp_path.to_str().unwrap()).expect("store");

  // Historial vacío al inicio.
  assert!(store.recent(10).expect("recent on empty").is_empty());

  store.append(entry("caffeine", 2519)).expect("append 1");
  store.append(entry("aspirin", 2244)).expect("append 2");
  store.append(entry("glucose", 5793)).expect("append 3");

  let rows = store.recent(10).expect("recent");
  assert_eq!(rows.len(), 3);
  // Más reciente primero.
  assert_eq!(rows[0].compound_name, "glucose");
  assert_eq!(rows[1].compound_name, "aspirin");
  assert_eq!(rows[2].compound_name, "caffeine");
  assert!(rows[0].searched_at_ts >= rows[2].searched_at_ts);
  assert_eq!(rows[1].cid, 2244);
  assert_eq!(rows[1].molecular_weight, Some(194.19));

  let _ = std::fs::remove_file(&tmp_path);
}

#[test]
fn diesel_history_caps_recent_at_ten() {
  let tmp_path = temp_db_path();
  let store = new_sqlite_for_test(tmp_path.to_str().unwrap()).expect("store");

  for i in 0..12 {
    store.append(entry(&format!("mol-{}", i), i + 1)).expect("append");
  }

  // Tope fijo de diez aunque el caller pida más.
  assert_eq!(store.recent(10).expect("recent 10").len(), 10);
  assert_eq!(store.recent(100).expect("recent 100").len(), 10);
  assert_eq!(store.recent(4).expect("recent 4").len(), 4);

  // Log de solo-agregado: las repetidas no deduplican.
  store.append(entry("mol-0", 1)).expect("append repeated");
  let rows = store.recent(10).expect("recent after repeat");
  assert_eq!(rows[0].compound_name, "mol-0");

  let _ = std::fs::remove_file(&tmp_path);
}

#[test]
fn unreachable_backend_is_an_error_not_a_panic() {
  // Ruta en un directorio inexistente: la conexión inicial falla y la
  // construcción devuelve Err para que el caller deshabilite el historial.
  let bad_path = std::env::temp_dir().join(format!("molvista_missing_{}/history.db", Uuid::new_v4()));
  let res = new_sqlite_for_test(bad_path.to_str().unwrap());
  assert!(res.is_err());
}
