// record.rs
use crate::{DescriptorSet, DomainError, Field};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Registro transitorio de un compuesto resuelto contra la base externa.
///
/// Invariante: el `cid` (identificador PubChem) siempre está presente y es
/// positivo; el resto de los campos usa `Field` para marcar datos que la
/// fuente no entregó. Se crea uno por consulta y se descarta al expirar la
/// caché.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeRecord {
  cid: i64,
  formula: Field<String>,
  weight: Field<f64>,
  iupac_name: Field<String>,
  smiles: Field<String>,
  molblock: Field<String>,
  descriptors: DescriptorSet,
}

impl MoleculeRecord {
  pub fn new(cid: i64,
             formula: Field<String>,
             weight: Field<f64>,
             iupac_name: Field<String>,
             smiles: Field<String>,
             molblock: Field<String>)
             -> Result<Self, DomainError> {
    if cid <= 0 {
      return Err(DomainError::Validation(format!("CID debe ser un entero positivo, se recibió {}", cid)));
    }
    Ok(Self { cid,
              formula,
              weight,
              iupac_name,
              smiles,
              molblock,
              descriptors: DescriptorSet::empty() })
  }

  pub fn cid(&self) -> i64 {
    self.cid
  }

  pub fn formula(&self) -> &Field<String> {
    &self.formula
  }

  pub fn weight(&self) -> &Field<f64> {
    &self.weight
  }

  pub fn iupac_name(&self) -> &Field<String> {
    &self.iupac_name
  }

  /// Notación lineal compacta (SMILES canónico o isomérico).
  pub fn smiles(&self) -> &Field<String> {
    &self.smiles
  }

  /// Registro 3D en tabla de conexiones (SDF) para el visor interactivo.
  pub fn molblock(&self) -> &Field<String> {
    &self.molblock
  }

  pub fn descriptors(&self) -> &DescriptorSet {
    &self.descriptors
  }

  /// Devuelve una copia del registro con los descriptores calculados.
  pub fn with_descriptors(mut self, descriptors: DescriptorSet) -> Self {
    self.descriptors = descriptors;
    self
  }
}

impl fmt::Display for MoleculeRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f,
           "MoleculeRecord(CID: {}, formula: {}, weight: {} g/mol)",
           self.cid, self.formula, self.weight)
  }
}
