//! Database model for calculation records.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use feecalc_core::commissions::{
    CalculationRecord, CalculationSummary, CommissionBreakdown, NewCalculationRecord, RawFieldSet,
    SchemeType,
};
use feecalc_core::Result;

/// Row of `calculation_records`. The field set and breakdown are stored as JSON text.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::calculation_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CalculationRecordDB {
    pub id: String,
    pub biller_name: String,
    pub file_name: String,
    pub scheme_type: String,
    pub layout_version: String,
    pub raw_fields: String,
    pub breakdown: String,
    pub submitted_by: String,
    pub created_at: NaiveDateTime,
}

/// Columns needed for a history listing; skips the JSON payloads.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::calculation_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CalculationSummaryDB {
    pub id: String,
    pub biller_name: String,
    pub file_name: String,
    pub scheme_type: String,
    pub submitted_by: String,
    pub created_at: NaiveDateTime,
}

impl CalculationRecordDB {
    pub fn from_new(
        id: String,
        created_at: NaiveDateTime,
        record: &NewCalculationRecord,
    ) -> Result<Self> {
        Ok(Self {
            id,
            biller_name: record.biller_name.clone(),
            file_name: record.file_name.clone(),
            scheme_type: record.scheme_type.as_str().to_string(),
            layout_version: record.layout_version.clone(),
            raw_fields: serde_json::to_string(&record.raw_fields)?,
            breakdown: serde_json::to_string(&record.breakdown)?,
            submitted_by: record.submitted_by.clone(),
            created_at,
        })
    }
}

impl TryFrom<CalculationRecordDB> for CalculationRecord {
    type Error = feecalc_core::Error;

    fn try_from(db: CalculationRecordDB) -> Result<Self> {
        let raw_fields: RawFieldSet = serde_json::from_str(&db.raw_fields)?;
        let breakdown: CommissionBreakdown = serde_json::from_str(&db.breakdown)?;
        Ok(Self {
            scheme_type: db.scheme_type.parse::<SchemeType>()?,
            id: db.id,
            biller_name: db.biller_name,
            file_name: db.file_name,
            layout_version: db.layout_version,
            raw_fields,
            breakdown,
            submitted_by: db.submitted_by,
            created_at: db.created_at,
        })
    }
}

impl TryFrom<CalculationSummaryDB> for CalculationSummary {
    type Error = feecalc_core::Error;

    fn try_from(db: CalculationSummaryDB) -> Result<Self> {
        Ok(Self {
            scheme_type: db.scheme_type.parse::<SchemeType>()?,
            id: db.id,
            biller_name: db.biller_name,
            file_name: db.file_name,
            submitted_by: db.submitted_by,
            created_at: db.created_at,
        })
    }
}
