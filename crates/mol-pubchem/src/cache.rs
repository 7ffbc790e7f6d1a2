// cache.rs
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Ventana de memoización por defecto: una hora, igual que la app original.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Mapa de memoización con expiración fija por entrada.
///
/// La expiración se fija al insertar y se verifica al leer; un acceso no
/// renueva la entrada (no es LRU). La cardinalidad de claves no está
/// acotada: a la escala esperada (sesiones interactivas) no hace falta
/// evicción de fondo, y `purge_expired` existe para quien quiera barrer
/// periódicamente. Una carrera entre consultas idénticas concurrentes solo
/// produce una búsqueda externa redundante, nunca corrupción.
pub struct TtlCache<V> {
  ttl: Duration,
  entries: Mutex<HashMap<String, (V, Instant)>>,
}

impl<V: Clone> TtlCache<V> {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl,
           entries: Mutex::new(HashMap::new()) }
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  /// Devuelve el valor si existe y su ventana no expiró; una entrada
  /// vencida se elimina en el momento de la lectura.
  pub fn get(&self, key: &str) -> Option<V> {
    let mut entries = self.entries.lock().ok()?;
    match entries.get(key) {
      Some((value, deadline)) if Instant::now() < *deadline => Some(value.clone()),
      Some(_) => {
        entries.remove(key);
        None
      }
      None => None,
    }
  }

  pub fn insert(&self, key: impl Into<String>, value: V) {
    if let Ok(mut entries) = self.entries.lock() {
      entries.insert(key.into(), (value, Instant::now() + self.ttl));
    }
  }

  /// Barrido opcional de entradas vencidas; devuelve cuántas se eliminaron.
  pub fn purge_expired(&self) -> usize {
    match self.entries.lock() {
      Ok(mut entries) => {
        let before = entries.len();
        let now = Instant::now();
        entries.retain(|_, (_, deadline)| now < *deadline);
        before - entries.len()
      }
      Err(_) => 0,
    }
  }

  pub fn len(&self) -> usize {
    self.entries.lock().map(|e| e.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::thread;

  #[test]
  fn hit_within_window_miss_after_expiry() {
    let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(30));
    cache.insert("aspirin", 2244);
    assert_eq!(cache.get("aspirin"), Some(2244));

    thread::sleep(Duration::from_millis(40));
    assert_eq!(cache.get("aspirin"), None);
    // La lectura de una entrada vencida también la elimina.
    assert!(cache.is_empty());
  }

  #[test]
  fn access_does_not_refresh_the_deadline() {
    let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(50));
    cache.insert("k", 1);
    thread::sleep(Duration::from_millis(30));
    // Acceso a mitad de ventana: sigue viva pero no se renueva.
    assert_eq!(cache.get("k"), Some(1));
    thread::sleep(Duration::from_millis(30));
    assert_eq!(cache.get("k"), None);
  }

  #[test]
  fn purge_expired_sweeps_only_dead_entries() {
    let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(25));
    cache.insert("old", 1);
    thread::sleep(Duration::from_millis(35));
    cache.insert("fresh", 2);
    assert_eq!(cache.purge_expired(), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("fresh"), Some(2));
  }

  #[test]
  fn insert_overwrites_previous_value() {
    let cache: TtlCache<u32> = TtlCache::new(DEFAULT_TTL);
    cache.insert("k", 1);
    cache.insert("k", 2);
    assert_eq!(cache.get("k"), Some(2));
    assert_eq!(cache.len(), 1);
  }
}
