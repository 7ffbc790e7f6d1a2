// client.rs
use crate::FetchError;
use mol_domain::{Field, MoleculeRecord};
use serde_json::Value;
use std::time::Duration;

/// Longitud mínima de consulta; por debajo se rechaza localmente.
pub const MIN_QUERY_LEN: usize = 2;

const BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_CANDIDATES: usize = 10;

/// Fuente de datos de compuestos. Abstrae al cliente HTTP real para que el
/// `Fetcher` y la capa de servicio puedan probarse con stubs.
pub trait CompoundSource: Send + Sync {
  /// Candidatos (títulos) para autocompletar; best-effort, vacío ante fallo.
  fn search(&self, query: &str) -> Vec<String>;

  /// Resuelve identidad + propiedades + estructura 3D de un compuesto.
  fn fetch(&self, name: &str) -> Result<MoleculeRecord, FetchError>;

  /// Imagen rasterizada 2D (PNG) por identificador.
  fn png_2d(&self, cid: i64) -> Result<Vec<u8>, FetchError>;

  /// Imagen rasterizada del confórmero 3D (PNG) por identificador.
  fn png_3d(&self, cid: i64) -> Result<Vec<u8>, FetchError>;
}

/// Cliente del PUG REST de PubChem (GET sin autenticación, un intento por
/// llamada, timeout fijo).
pub struct PubChemClient {
  http: reqwest::blocking::Client,
  base: String,
}

impl PubChemClient {
  pub fn new() -> Result<Self, FetchError> {
    Self::with_base(BASE_URL)
  }

  /// Permite apuntar a otra base (tests o mirrors).
  pub fn with_base(base: impl Into<String>) -> Result<Self, FetchError> {
    let http = reqwest::blocking::Client::builder().timeout(HTTP_TIMEOUT)
                                                   .build()?;
    Ok(Self { http, base: base.into() })
  }

  fn get_json(&self, url: &str) -> Result<Value, FetchError> {
    Ok(self.http.get(url).send()?.error_for_status()?.json()?)
  }

  fn get_text(&self, url: &str) -> Result<String, FetchError> {
    Ok(self.http.get(url).send()?.error_for_status()?.text()?)
  }

  fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    Ok(self.http.get(url).send()?.error_for_status()?.bytes()?.to_vec())
  }

  /// Resuelve un nombre a su lista de CIDs candidatos.
  fn resolve_cids(&self, name: &str) -> Result<Vec<i64>, FetchError> {
    let url = format!("{}/compound/name/{}/cids/JSON", self.base, name);
    let body = self.get_json(&url)?;
    Ok(parse_cid_list(&body))
  }

  /// Primer candidato para un nombre. Limitación conocida y deliberada: si
  /// el nombre resuelve a varios compuestos no hay desambiguación, gana el
  /// primero que entrega la API (comportamiento heredado de la app
  /// original, preservado tal cual).
  fn resolve_cid(&self, name: &str) -> Result<i64, FetchError> {
    self.resolve_cids(name)
        .ok()
        .and_then(|cids| cids.first().copied())
        .ok_or_else(|| FetchError::NotFound(name.to_string()))
  }

  fn fetch_properties(&self, cid: i64) -> Result<PropertyBundle, FetchError> {
    let url = format!("{}/compound/cid/{}/property/MolecularFormula,MolecularWeight,IUPACName,CanonicalSMILES,\
                       IsomericSMILES/JSON",
                      self.base, cid);
    let body = self.get_json(&url)?;
    parse_properties(&body).ok_or_else(|| FetchError::Malformed(format!("PropertyTable ausente para CID {}", cid)))
  }

  fn fetch_sdf(&self, cid: i64) -> Result<String, FetchError> {
    let url = format!("{}/compound/cid/{}/SDF", self.base, cid);
    self.get_text(&url)
  }
}

impl CompoundSource for PubChemClient {
  fn search(&self, query: &str) -> Vec<String> {
    let query = query.trim();
    if query.len() < MIN_QUERY_LEN {
      return Vec::new();
    }
    let cids = match self.resolve_cids(query) {
      Ok(cids) => cids,
      Err(e) => {
        log::debug!("búsqueda '{}' sin resultados: {}", query, e);
        return Vec::new();
      }
    };
    let mut titles = Vec::with_capacity(cids.len().min(MAX_CANDIDATES));
    for cid in cids.into_iter().take(MAX_CANDIDATES) {
      let url = format!("{}/compound/cid/{}/property/Title,MolecularFormula/JSON", self.base, cid);
      match self.get_json(&url) {
        Ok(body) => {
          if let Some(title) = parse_title(&body) {
            titles.push(title);
          }
        }
        Err(e) => log::debug!("no se pudo obtener el título del CID {}: {}", cid, e),
      }
    }
    titles
  }

  fn fetch(&self, name: &str) -> Result<MoleculeRecord, FetchError> {
    let name = name.trim();
    if name.len() < MIN_QUERY_LEN {
      return Err(FetchError::InvalidQuery(format!("se requieren al menos {} caracteres", MIN_QUERY_LEN)));
    }

    // Resolución de identidad: su fallo aborta toda la consulta.
    let cid = self.resolve_cid(name)?;

    // Consultas secundarias independientemente falibles: un fallo degrada
    // el campo, no la consulta completa.
    let (formula, weight, iupac_name, smiles) = match self.fetch_properties(cid) {
      Ok(props) => (props.formula, props.weight, props.iupac_name, props.smiles),
      Err(e) => {
        log::warn!("propiedades no disponibles para CID {}: {}", cid, e);
        (Field::Unavailable, Field::Unavailable, Field::Unavailable, Field::Unavailable)
      }
    };
    let molblock = match self.fetch_sdf(cid) {
      Ok(sdf) => Field::Value(sdf),
      Err(e) => {
        log::warn!("estructura 3D no disponible para CID {}: {}", cid, e);
        Field::Unavailable
      }
    };

    MoleculeRecord::new(cid, formula, weight, iupac_name, smiles, molblock)
      .map_err(|e| FetchError::Malformed(e.to_string()))
  }

  fn png_2d(&self, cid: i64) -> Result<Vec<u8>, FetchError> {
    let url = format!("{}/compound/cid/{}/PNG?image_size=large", self.base, cid);
    self.get_bytes(&url)
  }

  fn png_3d(&self, cid: i64) -> Result<Vec<u8>, FetchError> {
    let url = format!("{}/compound/cid/{}/PNG?image_size=large&image_type=3d", self.base, cid);
    self.get_bytes(&url)
  }
}

struct PropertyBundle {
  formula: Field<String>,
  weight: Field<f64>,
  iupac_name: Field<String>,
  smiles: Field<String>,
}

fn parse_cid_list(body: &Value) -> Vec<i64> {
  body.get("IdentifierList")
      .and_then(|v| v.get("CID"))
      .and_then(Value::as_array)
      .map(|cids| cids.iter().filter_map(Value::as_i64).filter(|&cid| cid > 0).collect())
      .unwrap_or_default()
}

fn first_property(body: &Value) -> Option<&Value> {
  body.get("PropertyTable")?.get("Properties")?.as_array()?.first()
}

fn parse_title(body: &Value) -> Option<String> {
  first_property(body)?.get("Title")?.as_str().map(str::to_string)
}

fn parse_properties(body: &Value) -> Option<PropertyBundle> {
  let props = first_property(body)?;
  let formula = str_field(props, "MolecularFormula");
  let iupac_name = str_field(props, "IUPACName");
  // SMILES canónico con fallback al isomérico, como la app original.
  let smiles = match str_field(props, "CanonicalSMILES") {
    Field::Value(s) => Field::Value(s),
    Field::Unavailable => str_field(props, "IsomericSMILES"),
  };
  Some(PropertyBundle { formula,
                        weight: parse_weight(props),
                        iupac_name,
                        smiles })
}

fn str_field(props: &Value, key: &str) -> Field<String> {
  props.get(key).and_then(Value::as_str).map(str::to_string).into()
}

// El PUG REST serializa MolecularWeight como cadena en las respuestas
// actuales; se aceptan ambas formas.
fn parse_weight(props: &Value) -> Field<f64> {
  match props.get("MolecularWeight") {
    Some(Value::Number(n)) => n.as_f64().into(),
    Some(Value::String(s)) => s.parse::<f64>().ok().into(),
    _ => Field::Unavailable,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn cid_list_parses_and_filters_non_positive() {
    let body = json!({"IdentifierList": {"CID": [2244, 0, -3, 2519]}});
    assert_eq!(parse_cid_list(&body), vec![2244, 2519]);
  }

  #[test]
  fn cid_list_is_empty_for_unexpected_shapes() {
    assert!(parse_cid_list(&json!({})).is_empty());
    assert!(parse_cid_list(&json!({"Fault": {"Code": "PUGREST.NotFound"}})).is_empty());
    assert!(parse_cid_list(&json!({"IdentifierList": {"CID": "2244"}})).is_empty());
  }

  #[test]
  fn properties_parse_with_string_weight() {
    let body = json!({"PropertyTable": {"Properties": [{
      "CID": 2244,
      "MolecularFormula": "C9H8O4",
      "MolecularWeight": "180.16",
      "IUPACName": "2-acetyloxybenzoic acid",
      "CanonicalSMILES": "CC(=O)OC1=CC=CC=C1C(=O)O"
    }]}});
    let props = parse_properties(&body).expect("bundle");
    assert_eq!(props.formula, Field::Value("C9H8O4".to_string()));
    assert_eq!(props.weight, Field::Value(180.16));
    assert_eq!(props.smiles, Field::Value("CC(=O)OC1=CC=CC=C1C(=O)O".to_string()));
  }

  #[test]
  fn properties_parse_with_numeric_weight_and_isomeric_fallback() {
    let body = json!({"PropertyTable": {"Properties": [{
      "CID": 702,
      "MolecularFormula": "C2H6O",
      "MolecularWeight": 46.07,
      "IsomericSMILES": "CCO"
    }]}});
    let props = parse_properties(&body).expect("bundle");
    assert_eq!(props.weight, Field::Value(46.07));
    assert_eq!(props.smiles, Field::Value("CCO".to_string()));
    // Campo presente en la forma pero ausente en la respuesta: no
    // disponible, no error.
    assert_eq!(props.iupac_name, Field::Unavailable);
  }

  #[test]
  fn properties_missing_table_is_none() {
    assert!(parse_properties(&json!({})).is_none());
    assert!(parse_properties(&json!({"PropertyTable": {"Properties": []}})).is_none());
  }

  #[test]
  fn title_parses_from_property_table() {
    let body = json!({"PropertyTable": {"Properties": [{"CID": 2244, "Title": "Aspirin"}]}});
    assert_eq!(parse_title(&body), Some("Aspirin".to_string()));
    assert_eq!(parse_title(&json!({})), None);
  }
}
