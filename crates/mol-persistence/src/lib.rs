//! Persistencia Diesel del historial de búsquedas.
//! Este archivo expone el módulo `schema` y reexporta el store Diesel que
//! implementa el trait `HistoryStore` del dominio. La implementación
//! detallada está en `history_persistence.rs`.

mod history_persistence;
pub mod schema;

#[cfg(not(feature = "pg"))]
pub use history_persistence::new_sqlite_for_test;
pub use history_persistence::{new_from_env, DieselHistoryStore};
