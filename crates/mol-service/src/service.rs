// Archivo: service.rs
// Propósito: implementar `MoleculeService`, la capa orquestadora que expone
// las operaciones de alto nivel por interacción del usuario: búsqueda de
// candidatos, consulta de un compuesto (fetch → descriptores → historial) y
// lectura del historial reciente.
use mol_domain::{compute_descriptors, descriptors_from_molblock, DescriptorSet, HistoryEntry, HistoryStore,
                 MoleculeRecord, NewHistoryEntry, MAX_RECENT};
use mol_pubchem::{CompoundSource, FetchError, Fetcher, PubChemClient};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Servicio de alto nivel sobre el pipeline de obtención de datos.
///
/// El store de historial se inyecta explícitamente (puede no haber ninguno
/// si la persistencia está deshabilitada) y es estrictamente best-effort:
/// sus fallos se reportan por el log del operador y jamás alteran el camino
/// de la respuesta principal. Tras el primer fallo el historial queda
/// deshabilitado por el resto de la vida del proceso.
pub struct MoleculeService<S: CompoundSource> {
    fetcher: Fetcher<S>,
    store: Option<Arc<dyn HistoryStore>>,
    history_down: AtomicBool,
}

impl MoleculeService<PubChemClient> {
    /// Construye el servicio de producción: cliente PubChem real y store
    /// de historial desde el entorno. La ausencia de URL de base de datos
    /// deshabilita el historial sin afectar búsqueda ni visualización.
    pub fn from_env() -> Result<Self, FetchError> {
        let client = PubChemClient::new()?;
        let store: Option<Arc<dyn HistoryStore>> = match mol_persistence::new_from_env() {
            Ok(s) => Some(Arc::new(s)),
            Err(e) => {
                log::warn!("historial deshabilitado: {}", e);
                None
            }
        };
        Ok(Self::new(client, store))
    }
}

impl<S: CompoundSource> MoleculeService<S> {
    pub fn new(source: S, store: Option<Arc<dyn HistoryStore>>) -> Self {
        Self { fetcher: Fetcher::new(source),
               store,
               history_down: AtomicBool::new(false) }
    }

    /// Variante con ventana de caché explícita (tests).
    pub fn with_ttl(source: S, store: Option<Arc<dyn HistoryStore>>, ttl: Duration) -> Self {
        Self { fetcher: Fetcher::with_ttl(source, ttl),
               store,
               history_down: AtomicBool::new(false) }
    }

    /// Candidatos para autocompletar; vacío ante consulta corta o fallo.
    pub fn candidates(&self, query: &str) -> Vec<String> {
        self.fetcher.search(query)
    }

    /// Consulta principal: resuelve el compuesto (con caché), calcula los
    /// descriptores cuando hay SMILES disponible y registra la búsqueda en
    /// el historial sin bloquear la respuesta.
    pub fn lookup(&self, name: &str) -> Result<MoleculeRecord, FetchError> {
        let record = self.fetcher.fetch(name)?;

        let record = match record.smiles().value() {
            Some(smiles) => {
                let descriptors = compute_descriptors(smiles);
                record.with_descriptors(descriptors)
            }
            None => record,
        };

        self.log_history(name, &record);
        Ok(record)
    }

    /// Descriptores para una estructura dibujada a mano (tabla de
    /// conexiones MOL). Conjunto vacío significa "sin datos", no error.
    pub fn descriptors_for_molblock(&self, molblock: &str) -> DescriptorSet {
        descriptors_from_molblock(molblock)
    }

    /// Historial reciente, más nuevo primero. Devuelve lista vacía si no
    /// hay store, si el historial quedó deshabilitado o si la lectura
    /// falla; nunca propaga el error al caller.
    pub fn recent(&self) -> Vec<HistoryEntry> {
        if self.history_down.load(Ordering::SeqCst) {
            return Vec::new();
        }
        let store = match &self.store {
            Some(s) => s,
            None => return Vec::new(),
        };
        match store.recent(MAX_RECENT) {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("no se pudo leer el historial: {}", e);
                self.history_down.store(true, Ordering::SeqCst);
                Vec::new()
            }
        }
    }

    /// Acceso a la fuente para llamadas sin caché (imágenes PNG).
    pub fn source(&self) -> &S {
        self.fetcher.source()
    }

    /// Indica si el historial sigue operativo (diagnóstico para la UI).
    pub fn history_enabled(&self) -> bool {
        self.store.is_some() && !self.history_down.load(Ordering::SeqCst)
    }

    // Registro best-effort: el dato ya fue entregado al caller antes de
    // llegar aquí, así que un fallo solo se reporta al operador.
    fn log_history(&self, name: &str, record: &MoleculeRecord) {
        if self.history_down.load(Ordering::SeqCst) {
            return;
        }
        let store = match &self.store {
            Some(s) => s,
            None => return,
        };
        let entry = NewHistoryEntry::from_record(name.trim(), record);
        if let Err(e) = store.append(entry) {
            log::error!("no se pudo registrar la búsqueda '{}': {}", name, e);
            self.history_down.store(true, Ordering::SeqCst);
        }
    }
}
