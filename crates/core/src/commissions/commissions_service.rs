use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

use super::biller_name::derive_biller_name;
use super::commissions_errors::CommissionError;
use super::commissions_model::{
    CalculationRecord, CalculationSearchRequest, CalculationSearchResponse, NewCalculationRecord,
    SchemeWorkbook,
};
use super::commissions_traits::{CalculationRepositoryTrait, CalculationServiceTrait};
use super::export::export_csv;
use super::formula::compute_breakdown;
use crate::errors::{Result, ValidationError};
use crate::extraction::{SchemeLayout, WorkbookExtractorTrait};

/// Orchestrates a scheme submission end to end.
pub struct CalculationService {
    repository: Arc<dyn CalculationRepositoryTrait>,
    extractor: Arc<dyn WorkbookExtractorTrait>,
}

impl CalculationService {
    pub fn new(
        repository: Arc<dyn CalculationRepositoryTrait>,
        extractor: Arc<dyn WorkbookExtractorTrait>,
    ) -> Self {
        Self {
            repository,
            extractor,
        }
    }

    fn ensure_not_processed(&self, file_name: &str) -> Result<()> {
        if let Some(existing) = self.repository.find_by_file_name(file_name)? {
            info!(
                "Rejecting '{}': already processed as record {} on {}",
                file_name, existing.id, existing.created_at
            );
            return Err(CommissionError::DuplicateFile {
                file_name: existing.file_name,
                record_id: existing.id,
                created_at: existing.created_at,
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl CalculationServiceTrait for CalculationService {
    async fn submit_calculation(
        &self,
        workbook: SchemeWorkbook,
        submitted_by: &str,
    ) -> Result<CalculationRecord> {
        let submitted_by = submitted_by.trim();
        if submitted_by.is_empty() {
            return Err(ValidationError::MissingField("submittedBy".to_string()).into());
        }
        let file_name = workbook.file_name.trim();
        if file_name.is_empty() {
            return Err(ValidationError::MissingField("fileName".to_string()).into());
        }

        let layout = match SchemeLayout::for_scheme(workbook.scheme_type) {
            Some(layout) if workbook.scheme_type.is_supported() => layout,
            _ => {
                warn!(
                    "Scheme type {} submitted for '{}' is not supported",
                    workbook.scheme_type, file_name
                );
                return Err(CommissionError::UnsupportedSchemeType(workbook.scheme_type).into());
            }
        };

        self.ensure_not_processed(file_name)?;

        let raw_fields = self.extractor.extract(&workbook.content, layout)?;
        let breakdown = compute_breakdown(&raw_fields)?;
        let biller_name = derive_biller_name(file_name);
        debug!("Computed breakdown for biller '{}' from '{}'", biller_name, file_name);

        let record = self
            .repository
            .insert_record(NewCalculationRecord {
                biller_name,
                file_name: file_name.to_string(),
                scheme_type: workbook.scheme_type,
                layout_version: layout.version.to_string(),
                raw_fields,
                breakdown,
                submitted_by: submitted_by.to_string(),
            })
            .await?;

        info!(
            "Stored calculation {} for biller '{}' ({})",
            record.id, record.biller_name, record.file_name
        );
        Ok(record)
    }

    fn get_calculation(&self, record_id: &str) -> Result<CalculationRecord> {
        self.repository.get_by_id(record_id)
    }

    fn search_calculations(
        &self,
        request: &CalculationSearchRequest,
    ) -> Result<CalculationSearchResponse> {
        self.repository.search(request)
    }

    fn export_calculation(&self, record_id: &str) -> Result<String> {
        let record = self.repository.get_by_id(record_id)?;
        export_csv(&record)
    }
}
