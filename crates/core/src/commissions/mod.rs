//! Commissions module - domain models, formula engine, services, and traits.

mod biller_name;
mod commissions_errors;
mod commissions_model;
mod commissions_service;
mod commissions_traits;
mod export;
mod formatting;
pub mod formula;


pub use biller_name::derive_biller_name;
pub use commissions_errors::{CommissionError, ErrorCategory};
pub use commissions_model::{
    CalculationRecord, CalculationSearchRequest, CalculationSearchResponse, CalculationSummary,
    Channel, ChannelBreakdown, CommissionBreakdown, CommissionShares, FieldKey,
    NewCalculationRecord, Persona, PersonaBreakdown, RawFieldSet, SchemeType, SchemeWorkbook,
    Tier,
};
pub use commissions_service::CalculationService;
pub use commissions_traits::{CalculationRepositoryTrait, CalculationServiceTrait};
pub use export::export_csv;
pub use formatting::{
    format_fixed, FormattedBreakdown, FormattedCalculation, FormattedChannel,
    FormattedCommissions, FormattedPersona,
};
pub use formula::compute_breakdown;
