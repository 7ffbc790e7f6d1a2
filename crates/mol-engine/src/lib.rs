//! Puente hacia RDKit (Python) para interpretar estructuras y calcular
//! descriptores fisicoquímicos.
//!
//! El crate no implementa química propia: delega el parseo de SMILES /
//! bloques MOL y todo el cálculo numérico en RDKit a través de `pyo3`.
//! Requiere un entorno Python con `rdkit` instalado en tiempo de ejecución.

mod engine;
mod errors;

pub use engine::{RawDescriptors, RdkitEngine};
pub use errors::EngineError;
