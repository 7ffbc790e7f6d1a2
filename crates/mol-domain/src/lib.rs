mod descriptors;
mod errors;
mod field;
mod history;
mod record;

pub use descriptors::{compute_descriptors, descriptors_from_molblock, DescriptorSet};
pub use errors::DomainError;
pub use field::Field;
pub use history::{HistoryEntry, HistoryStore, InMemoryHistoryStore, NewHistoryEntry, MAX_RECENT};
pub use record::MoleculeRecord;
