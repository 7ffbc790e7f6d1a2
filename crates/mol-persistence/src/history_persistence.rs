use crate::schema;
use crate::schema::molecule_history::dsl as history_dsl;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use mol_domain::{DomainError, HistoryEntry, HistoryStore, NewHistoryEntry, MAX_RECENT};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

#[cfg(all(feature = "pg", not(test)))]
type DbPool = Pool<ConnectionManager<PgConnection>>;
#[cfg(any(test, not(feature = "pg")))]
type DbPool = Pool<ConnectionManager<SqliteConnection>>;
#[cfg(all(feature = "pg", not(test)))]
type DbConn = PgConnection;
#[cfg(any(test, not(feature = "pg")))]
type DbConn = SqliteConnection;

/// Store Diesel que implementa `HistoryStore`.
///
/// El pool está limitado a una sola conexión: la base es un recurso
/// compartido único reutilizado entre consultas, y el volumen interactivo
/// esperado no justifica más. Se mantiene la maquinaria r2d2 para heredar
/// su reconexión y chequeo de salud.
pub struct DieselHistoryStore {
  pool: Arc<DbPool>,
}

impl DieselHistoryStore {
  /// Un backend inalcanzable (host caído, ruta SQLite inválida) es un
  /// error que el caller degrada a "historial deshabilitado"; la
  /// construcción nunca aborta el proceso.
  pub fn new(database_url: &str) -> Result<Self, DomainError> {
    #[cfg(any(test, not(feature = "pg")))]
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    #[cfg(all(feature = "pg", not(test)))]
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().max_size(1)
                              .connection_timeout(Duration::from_secs(5))
                              .build(manager)
                              .map_err(|e| DomainError::External(format!("pool: {}", e)))?;
    let store = DieselHistoryStore { pool: Arc::new(pool) };
    if let Ok(mut c) = store.conn_raw() {
      let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
      let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut c);
      if let Err(e) = c.run_pending_migrations(MIGRATIONS) {
        log::warn!("no se pudieron aplicar las migraciones: {}", e);
      }
    }
    Ok(store)
  }

  fn conn_raw(&self) -> std::result::Result<PooledConnection<ConnectionManager<DbConn>>, r2d2::Error> {
    // Note: when built with pg feature this will be adjusted by cfg above
    self.pool.get()
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>, DomainError> {
    self.conn_raw().map_err(|e| DomainError::External(format!("pool: {}", e)))
  }
}

// Fila Diesel de la tabla de historial
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::molecule_history)]
struct HistoryRow {
  pub id: String,
  pub compound_name: String,
  pub cid: i64,
  pub formula: String,
  pub smiles: String,
  pub molecular_weight: Option<f64>,
  pub molblock: Option<String>,
  pub logp: Option<f64>,
  pub tpsa: Option<f64>,
  pub searched_at_ts: i64,
}

impl From<HistoryRow> for HistoryEntry {
  fn from(r: HistoryRow) -> Self {
    HistoryEntry { id: r.id,
                   compound_name: r.compound_name,
                   cid: r.cid,
                   formula: r.formula,
                   smiles: r.smiles,
                   molecular_weight: r.molecular_weight,
                   molblock: r.molblock,
                   logp: r.logp,
                   tpsa: r.tpsa,
                   searched_at_ts: r.searched_at_ts }
  }
}

fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T, DomainError> {
  res.map_err(|e| DomainError::External(format!("db: {}", e)))
}

impl HistoryStore for DieselHistoryStore {
  fn append(&self, entry: NewHistoryEntry) -> Result<String, DomainError> {
    let mut conn = self.conn()?;
    let row = HistoryRow { id: Uuid::new_v4().to_string(),
                           compound_name: entry.compound_name,
                           cid: entry.cid,
                           formula: entry.formula,
                           smiles: entry.smiles,
                           molecular_weight: entry.molecular_weight,
                           molblock: entry.molblock,
                           logp: entry.logp,
                           tpsa: entry.tpsa,
                           // Timestamp asignado al insertar; el caller no lo provee.
                           searched_at_ts: Utc::now().timestamp_micros() };
    let id = row.id.clone();
    map_db_err(diesel::insert_into(schema::molecule_history::table).values(&row).execute(&mut conn))?;
    Ok(id)
  }

  fn recent(&self, limit: i64) -> Result<Vec<HistoryEntry>, DomainError> {
    let mut conn = self.conn()?;
    let cap = limit.clamp(0, MAX_RECENT);
    let rows = history_dsl::molecule_history.order(history_dsl::searched_at_ts.desc())
                                            .limit(cap)
                                            .load::<HistoryRow>(&mut conn)
                                            .map_err(|e| DomainError::External(format!("db: {}", e)))?;
    Ok(rows.into_iter().map(HistoryEntry::from).collect())
  }
}

/// Construye el store desde variables de entorno. Cuando se compila con
/// soporte Postgres se prefiere MOLVISTA_DB_URL, con DATABASE_URL como
/// fallback. La ausencia de URL es un error que el binario degrada a
/// "historial deshabilitado", nunca fatal para la aplicación.
#[cfg(all(feature = "pg", not(test)))]
pub fn new_from_env() -> Result<DieselHistoryStore, DomainError> {
  dotenvy::dotenv().ok();
  let url = std::env::var("MOLVISTA_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                            .map_err(|_| DomainError::External("MOLVISTA_DB_URL / DATABASE_URL not set".into()))?;
  if !(url.starts_with("postgres") || url.starts_with("postgresql://") || url.contains("@")) {
    return Err(DomainError::External("mol-persistence: MOLVISTA_DB_URL does not look like Postgres URL".into()));
  }
  DieselHistoryStore::new(&url)
}

#[cfg(test)]
pub fn new_from_env() -> Result<DieselHistoryStore, DomainError> {
  dotenvy::dotenv().ok();
  let url = std::env::var("MOLVISTA_DB_URL").unwrap_or_else(|_| "file:molhistdb?mode=memory&cache=shared".into());
  DieselHistoryStore::new(&url)
}

#[cfg(all(not(feature = "pg"), not(test)))]
pub fn new_from_env() -> Result<DieselHistoryStore, DomainError> {
  dotenvy::dotenv().ok();
  let url = std::env::var("MOLVISTA_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                            .map_err(|_| DomainError::External("MOLVISTA_DB_URL / DATABASE_URL not set".into()))?;
  let url_l = url.to_lowercase();
  if url_l.starts_with("file:") || url_l.contains("mode=memory") || url_l.contains("sqlite") {
    return DieselHistoryStore::new(&url);
  }
  Err(DomainError::External("mol-persistence was compiled without 'pg' feature; enable the 'pg' feature to use \
                             Postgres in production"
                                                   .into()))
}

// Test helper: construct a DieselHistoryStore backed by explicit SQLite
// connection manager. This bypasses environment parsing and avoids cases
// where the build or features might cause the ConnectionManager to treat
// the string as Postgres connection info.
#[cfg(not(feature = "pg"))]
pub fn new_sqlite_for_test(database_url: &str) -> Result<DieselHistoryStore, DomainError> {
  use diesel::r2d2::ConnectionManager;
  use diesel::sqlite::SqliteConnection;
  let manager = ConnectionManager::<SqliteConnection>::new(database_url);
  let pool = Pool::builder().max_size(1)
                            .connection_timeout(Duration::from_secs(1))
                            .build(manager)
                            .map_err(|e| DomainError::External(format!("pool: {}", e)))?;
  let store = DieselHistoryStore { pool: Arc::new(pool) };
  if let Ok(mut c) = store.conn_raw() {
    let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
    let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut c);
    let _ = c.run_pending_migrations(MIGRATIONS);
  }
  Ok(store)
}
