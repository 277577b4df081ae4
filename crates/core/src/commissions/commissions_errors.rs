use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::commissions_model::{Channel, Persona, SchemeType};

/// Broad class of an engine failure, used by callers to pick a message or status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// The uploaded file cannot be read as a scheme workbook.
    InputFormat,
    /// Expected, user-facing condition (duplicate upload, unsupported type).
    BusinessRule,
    /// The workbook reads fine but its figures do not reconcile.
    Consistency,
    NotFound,
}

#[derive(Error, Debug)]
pub enum CommissionError {
    #[error("Malformed workbook: {0}")]
    MalformedWorkbook(String),

    #[error("Workbook does not contain a worksheet")]
    MissingWorksheet,

    #[error("Invalid cell reference '{0}'")]
    InvalidCellReference(String),

    #[error("Cell {cell} ({field}) is not numeric: {found}")]
    NonNumericCell {
        field: String,
        cell: String,
        found: String,
    },

    #[error("Field {0} was not extracted from the workbook")]
    MissingField(String),

    #[error("Field {field} is negative ({value})")]
    NegativeValue { field: String, value: Decimal },

    #[error("Field {field} is too large to convert to a percentage")]
    ValueOutOfRange { field: String },

    #[error("{persona} {channel} shares add up to {actual}% but must reconcile to {expected}%")]
    InconsistentTotals {
        persona: Persona,
        channel: Channel,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("File '{file_name}' was already processed on {created_at} (record {record_id})")]
    DuplicateFile {
        file_name: String,
        record_id: String,
        created_at: NaiveDateTime,
    },

    #[error("Scheme type {0} is not yet supported")]
    UnsupportedSchemeType(SchemeType),

    #[error("Calculation record '{0}' not found")]
    RecordNotFound(String),
}

impl CommissionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CommissionError::MalformedWorkbook(_)
            | CommissionError::MissingWorksheet
            | CommissionError::InvalidCellReference(_)
            | CommissionError::NonNumericCell { .. }
            | CommissionError::MissingField(_) => ErrorCategory::InputFormat,
            CommissionError::NegativeValue { .. }
            | CommissionError::ValueOutOfRange { .. }
            | CommissionError::InconsistentTotals { .. } => ErrorCategory::Consistency,
            CommissionError::DuplicateFile { .. } | CommissionError::UnsupportedSchemeType(_) => {
                ErrorCategory::BusinessRule
            }
            CommissionError::RecordNotFound(_) => ErrorCategory::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_separate_bad_files_from_bad_arithmetic() {
        let format_error = CommissionError::NonNumericCell {
            field: "Uddokta.APP.feeRate".to_string(),
            cell: "E4".to_string(),
            found: "text 'n/a'".to_string(),
        };
        let totals_error = CommissionError::InconsistentTotals {
            persona: Persona::Customer,
            channel: Channel::Ussd,
            expected: Decimal::ONE_HUNDRED,
            actual: Decimal::from(101),
        };
        assert_eq!(format_error.category(), ErrorCategory::InputFormat);
        assert_eq!(totals_error.category(), ErrorCategory::Consistency);
        assert_eq!(
            CommissionError::UnsupportedSchemeType(SchemeType::DropPoint).category(),
            ErrorCategory::BusinessRule
        );
        assert_eq!(
            CommissionError::UnsupportedSchemeType(SchemeType::EmiBiller).to_string(),
            "Scheme type EMI_BILLER is not yet supported"
        );
    }
}
