// fetcher.rs
use crate::{CompoundSource, FetchError, TtlCache, DEFAULT_TTL, MIN_QUERY_LEN};
use mol_domain::MoleculeRecord;
use std::time::Duration;

/// Fuente de compuestos con memoización por consulta.
///
/// Envuelve una `CompoundSource` y memoiza los `fetch` exitosos por cadena
/// de consulta (normalizada a minúsculas) durante la ventana fija. Solo se
/// cachean resultados exitosos: un "no encontrado" vuelve a consultarse la
/// próxima vez.
pub struct Fetcher<S: CompoundSource> {
  source: S,
  cache: TtlCache<MoleculeRecord>,
}

impl<S: CompoundSource> Fetcher<S> {
  pub fn new(source: S) -> Self {
    Self::with_ttl(source, DEFAULT_TTL)
  }

  pub fn with_ttl(source: S, ttl: Duration) -> Self {
    Self { source,
           cache: TtlCache::new(ttl) }
  }

  /// Acceso a la fuente subyacente (imágenes y otras llamadas sin caché).
  pub fn source(&self) -> &S {
    &self.source
  }

  /// Candidatos para autocompletar; el rechazo local evita la llamada de
  /// red para consultas cortas.
  pub fn search(&self, query: &str) -> Vec<String> {
    let query = query.trim();
    if query.len() < MIN_QUERY_LEN {
      return Vec::new();
    }
    self.source.search(query)
  }

  /// Obtiene el registro del compuesto, sirviendo desde caché dentro de la
  /// ventana TTL.
  pub fn fetch(&self, name: &str) -> Result<MoleculeRecord, FetchError> {
    let name = name.trim();
    if name.is_empty() {
      return Err(FetchError::InvalidQuery("la consulta no puede estar vacía".to_string()));
    }
    if name.len() < MIN_QUERY_LEN {
      return Err(FetchError::InvalidQuery(format!("se requieren al menos {} caracteres", MIN_QUERY_LEN)));
    }

    let key = name.to_lowercase();
    if let Some(hit) = self.cache.get(&key) {
      log::debug!("caché: hit para '{}'", key);
      return Ok(hit);
    }

    let record = self.source.fetch(name)?;
    self.cache.insert(key, record.clone());
    Ok(record)
  }

  /// Cantidad de entradas vivas más vencidas aún no barridas (diagnóstico).
  pub fn cached_entries(&self) -> usize {
    self.cache.len()
  }
}
