mod model;
mod repository;

pub use model::{LedgerEntryDB, NewLedgerEntryDB};
pub use repository::LedgerRepository;
