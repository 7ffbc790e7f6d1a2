// engine.rs
use crate::EngineError;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use serde::{Deserialize, Serialize};

/// Descriptores numéricos crudos tal como los reporta RDKit.
///
/// Los contadores (HBD, HBA, enlaces rotables, anillos) son enteros no
/// negativos; `logp` puede ser negativo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDescriptors {
  pub logp: f64,
  pub tpsa: f64,
  pub hbd: u32,
  pub hba: u32,
  pub rotatable_bonds: u32,
  pub ring_count: u32,
  pub aromatic_ring_count: u32,
}

/// Motor químico respaldado por RDKit.
///
/// Mantiene referencias a los módulos Python importados para no repetir el
/// costo de importación en cada llamada. Todas las operaciones son puras y
/// deterministas respecto de la estructura de entrada.
pub struct RdkitEngine {
  chem: Py<PyModule>,
  descriptors: Py<PyModule>,
  mol_descriptors: Py<PyModule>,
}

impl RdkitEngine {
  /// Inicializa el motor importando los módulos de RDKit una sola vez.
  pub fn init() -> Result<Self, EngineError> {
    Python::attach(|py| {
      let chem = py.import("rdkit.Chem")
                   .map_err(|e| EngineError::Unavailable(format!("rdkit.Chem: {}", e)))?;
      let descriptors = py.import("rdkit.Chem.Descriptors")
                          .map_err(|e| EngineError::Unavailable(format!("rdkit.Chem.Descriptors: {}", e)))?;
      let mol_descriptors = py.import("rdkit.Chem.rdMolDescriptors")
                              .map_err(|e| EngineError::Unavailable(format!("rdkit.Chem.rdMolDescriptors: {}", e)))?;
      Ok(Self { chem: chem.unbind(),
                descriptors: descriptors.unbind(),
                mol_descriptors: mol_descriptors.unbind() })
    })
  }

  /// Convierte un bloque MOL (tabla de conexiones) a SMILES canónico.
  ///
  /// Punto de entrada para estructuras dibujadas a mano: el editor entrega
  /// la tabla de conexiones y el resto del sistema trabaja sobre SMILES.
  pub fn smiles_from_molblock(&self, molblock: &str) -> Result<String, EngineError> {
    Python::attach(|py| {
      let chem = self.chem.bind(py);
      let mol = chem.call_method1("MolFromMolBlock", (molblock,))?;
      if mol.is_none() {
        return Err(EngineError::Parse("bloque MOL inválido".to_string()));
      }
      Ok(chem.call_method1("MolToSmiles", (&mol,))?.extract::<String>()?)
    })
  }

  /// Calcula el conjunto fijo de descriptores para un SMILES.
  pub fn descriptors(&self, smiles: &str) -> Result<RawDescriptors, EngineError> {
    Python::attach(|py| {
      let chem = self.chem.bind(py);
      let mol = chem.call_method1("MolFromSmiles", (smiles,))?;
      if mol.is_none() {
        return Err(EngineError::Parse(format!("SMILES inválido: {}", smiles)));
      }
      let desc = self.descriptors.bind(py);
      let mol_desc = self.mol_descriptors.bind(py);
      let logp: f64 = desc.call_method1("MolLogP", (&mol,))?.extract()?;
      let tpsa: f64 = desc.call_method1("TPSA", (&mol,))?.extract()?;
      let hbd: u32 = desc.call_method1("NumHDonors", (&mol,))?.extract()?;
      let hba: u32 = desc.call_method1("NumHAcceptors", (&mol,))?.extract()?;
      let rotatable_bonds: u32 = desc.call_method1("NumRotatableBonds", (&mol,))?.extract()?;
      let ring_count: u32 = desc.call_method1("RingCount", (&mol,))?.extract()?;
      let aromatic_ring_count: u32 = mol_desc.call_method1("CalcNumAromaticRings", (&mol,))?.extract()?;
      Ok(RawDescriptors { logp,
                          tpsa,
                          hbd,
                          hba,
                          rotatable_bonds,
                          ring_count,
                          aromatic_ring_count })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // Estas pruebas requieren un entorno Python con RDKit instalado, por lo
  // que se marcan `#[ignore]` y se ejecutan manualmente con
  // `cargo test -- --ignored`.

  #[test]
  #[ignore]
  fn descriptors_for_ethanol_are_sane() {
    let engine = RdkitEngine::init().expect("rdkit available");
    let d = engine.descriptors("CCO").expect("descriptors");
    assert!(d.tpsa > 0.0);
    assert_eq!(d.hbd, 1);
    assert_eq!(d.hba, 1);
    assert_eq!(d.ring_count, 0);
  }

  #[test]
  #[ignore]
  fn invalid_smiles_is_a_parse_error() {
    let engine = RdkitEngine::init().expect("rdkit available");
    match engine.descriptors("esto-no-es-smiles") {
      Err(EngineError::Parse(_)) => {}
      other => panic!("expected parse error, got {:?}", other.map(|_| ())),
    }
  }

  #[test]
  #[ignore]
  fn benzene_has_one_aromatic_ring() {
    let engine = RdkitEngine::init().expect("rdkit available");
    let d = engine.descriptors("c1ccccc1").expect("descriptors");
    assert_eq!(d.ring_count, 1);
    assert_eq!(d.aromatic_ring_count, 1);
  }
}
