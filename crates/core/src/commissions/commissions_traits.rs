//! Calculation repository and service traits.
//!
//! These traits describe the history store and the submission workflow without
//! any database-specific types.

use async_trait::async_trait;

use super::commissions_model::{
    CalculationRecord, CalculationSearchRequest, CalculationSearchResponse, NewCalculationRecord,
    SchemeWorkbook,
};
use crate::errors::Result;

/// Contract for the append-only calculation history.
#[async_trait]
pub trait CalculationRepositoryTrait: Send + Sync {
    /// Retrieves a record by its ID.
    ///
    /// Fails with `CommissionError::RecordNotFound` when no record matches.
    fn get_by_id(&self, record_id: &str) -> Result<CalculationRecord>;

    /// Looks up the record created from an uploaded file name, if any.
    fn find_by_file_name(&self, file_name: &str) -> Result<Option<CalculationRecord>>;

    /// Case-insensitive biller substring search, newest first.
    fn search(&self, request: &CalculationSearchRequest) -> Result<CalculationSearchResponse>;

    /// Stores a new record and returns it with its generated ID and timestamp.
    ///
    /// The duplicate check and the insert happen atomically: a second record
    /// with the same file name fails with `CommissionError::DuplicateFile`.
    async fn insert_record(&self, new_record: NewCalculationRecord) -> Result<CalculationRecord>;
}

/// Contract for the submission and retrieval workflow.
#[async_trait]
pub trait CalculationServiceTrait: Send + Sync {
    /// Runs gating, the duplicate guard, extraction, computation and persistence.
    async fn submit_calculation(
        &self,
        workbook: SchemeWorkbook,
        submitted_by: &str,
    ) -> Result<CalculationRecord>;

    fn get_calculation(&self, record_id: &str) -> Result<CalculationRecord>;

    fn search_calculations(
        &self,
        request: &CalculationSearchRequest,
    ) -> Result<CalculationSearchResponse>;

    /// CSV rendering of a stored record.
    fn export_calculation(&self, record_id: &str) -> Result<String>;
}
