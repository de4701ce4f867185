mod model;
mod repository;

pub use model::{AlertDB, NewAlertDB};
pub use repository::AlertRepository;
