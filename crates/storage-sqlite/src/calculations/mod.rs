//! SQLite storage implementation for calculation history.

mod model;
mod repository;

pub use model::{CalculationRecordDB, CalculationSummaryDB};
pub use repository::CalculationRepository;
