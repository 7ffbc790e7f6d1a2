// errors.rs
use thiserror::Error;

/// Errores del camino de obtención de datos.
#[derive(Debug, Error)]
pub enum FetchError {
  /// Consulta rechazada localmente (vacía o demasiado corta); no se emite
  /// ninguna llamada de red.
  #[error("Consulta inválida: {0}")]
  InvalidQuery(String),
  /// La resolución de identidad no encontró el compuesto (cero candidatos,
  /// error HTTP o respuesta malformada colapsan en este resultado).
  #[error("Compuesto no encontrado: {0}")]
  NotFound(String),
  /// Error de transporte HTTP en una llamada secundaria.
  #[error("Error HTTP: {0}")]
  Http(#[from] reqwest::Error),
  /// Respuesta sintácticamente válida pero sin la forma esperada.
  #[error("Respuesta malformada: {0}")]
  Malformed(String),
}
