//! Cliente del PUG REST de PubChem y caché de memoización con TTL fijo.
//!
//! Diseño resumido:
//! - `PubChemClient` consume la API tal cual (GET sin autenticación, JSON /
//!   texto plano / PNG); un timeout fijo y un solo intento por llamada.
//! - La resolución de identidad es la única llamada cuyo fallo aborta la
//!   consulta; las consultas secundarias degradan su campo a "no disponible".
//! - `Fetcher` memoiza los resultados exitosos por cadena de consulta
//!   durante una ventana fija de una hora (expiración por reloj, sin LRU).

mod cache;
mod client;
mod errors;
mod fetcher;

pub use cache::{TtlCache, DEFAULT_TTL};
pub use client::{CompoundSource, PubChemClient, MIN_QUERY_LEN};
pub use errors::FetchError;
pub use fetcher::Fetcher;
