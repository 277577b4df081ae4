//! Fee-commission core - domain types, extraction, formulas and services.
//!
//! This crate contains the business logic of the fee-commission engine.
//! It is database-agnostic and defines the repository trait that is
//! implemented by the `storage-sqlite` crate.
//!
//! ```text
//! workbook bytes ──► extraction ──► commissions::formula ──► repository
//!                     (cells)        (breakdown)              (history)
//! ```

pub mod commissions;
pub mod constants;
pub mod errors;
pub mod extraction;

#[cfg(test)]
mod test_support;

// Re-export the vocabulary most callers need
pub use commissions::{
    CalculationRecord, CalculationSearchRequest, CalculationSearchResponse, CalculationService,
    CalculationServiceTrait, CalculationSummary, CommissionBreakdown, CommissionError,
    ErrorCategory, FormattedCalculation, RawFieldSet, SchemeType, SchemeWorkbook,
};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
