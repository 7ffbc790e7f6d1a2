//! Capa orquestadora de consultas de compuestos.
//!
//! Une las tres piezas del pipeline en el orden del flujo de control:
//! resolución contra PubChem (con memoización TTL), cálculo de
//! descriptores y registro best-effort en el historial. Pensada para ser
//! invocada desde el binario interactivo o desde cualquier capa de
//! presentación.

mod service;

pub use service::MoleculeService;
