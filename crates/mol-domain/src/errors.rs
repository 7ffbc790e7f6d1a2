// errors.rs
use mol_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DomainError {
  #[error("Error de validación: {0}")]
  Validation(String),
  #[error("Error externo: {0}")]
  External(String),
}

impl From<EngineError> for DomainError {
  fn from(e: EngineError) -> Self {
    Self::External(e.to_string())
  }
}
