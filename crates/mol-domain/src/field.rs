// field.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marcador explícito de disponibilidad para campos obtenidos de la API
/// externa.
///
/// A diferencia de `Option`, un `Field::Unavailable` significa "se intentó
/// obtener y la fuente no lo entregó" (por ejemplo, una consulta secundaria
/// que falló o un campo ausente en la respuesta). Los consumidores pueden
/// así distinguir un dato no disponible de un dato simplemente omitido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field<T> {
  Value(T),
  Unavailable,
}

impl<T> Field<T> {
  pub fn is_available(&self) -> bool {
    matches!(self, Field::Value(_))
  }

  pub fn value(&self) -> Option<&T> {
    match self {
      Field::Value(v) => Some(v),
      Field::Unavailable => None,
    }
  }

  pub fn into_value(self) -> Option<T> {
    match self {
      Field::Value(v) => Some(v),
      Field::Unavailable => None,
    }
  }

  pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
    match self {
      Field::Value(v) => Field::Value(f(v)),
      Field::Unavailable => Field::Unavailable,
    }
  }
}

impl<T> Default for Field<T> {
  fn default() -> Self {
    Field::Unavailable
  }
}

impl<T> From<Option<T>> for Field<T> {
  fn from(opt: Option<T>) -> Self {
    match opt {
      Some(v) => Field::Value(v),
      None => Field::Unavailable,
    }
  }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Field::Value(v) => v.fmt(f),
      // La app original muestra 'N/A' para datos no disponibles.
      Field::Unavailable => write!(f, "N/A"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_uses_na_for_unavailable() {
    let f: Field<String> = Field::Unavailable;
    assert_eq!(f.to_string(), "N/A");
    let g = Field::Value(42.5f64);
    assert_eq!(g.to_string(), "42.5");
  }

  #[test]
  fn serde_roundtrip_value_and_unavailable() {
    let v = Field::Value("C9H8O4".to_string());
    let s = serde_json::to_string(&v).unwrap();
    assert_eq!(s, "\"C9H8O4\"");
    let back: Field<String> = serde_json::from_str(&s).unwrap();
    assert_eq!(back, v);

    let u: Field<f64> = Field::Unavailable;
    let s = serde_json::to_string(&u).unwrap();
    assert_eq!(s, "null");
    let back: Field<f64> = serde_json::from_str("null").unwrap();
    assert_eq!(back, Field::Unavailable);
  }

  #[test]
  fn from_option_maps_none_to_unavailable() {
    assert_eq!(Field::from(Some(1)), Field::Value(1));
    assert_eq!(Field::<i32>::from(None), Field::Unavailable);
  }
}
