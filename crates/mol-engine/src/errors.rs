// errors.rs
use thiserror::Error;

/// Errores del puente RDKit.
#[derive(Debug, Error)]
pub enum EngineError {
  /// RDKit no se pudo importar (falta el entorno Python o el paquete).
  #[error("RDKit no disponible: {0}")]
  Unavailable(String),
  /// La notación estructural no se pudo interpretar (SMILES o MOL inválido).
  #[error("Estructura no interpretable: {0}")]
  Parse(String),
  /// Error propagado desde el runtime de Python.
  #[error("Error de Python: {0}")]
  Python(#[from] pyo3::PyErr),
}
