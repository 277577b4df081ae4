use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use log::{debug, warn};
use std::sync::Arc;
use uuid::Uuid;

use feecalc_core::commissions::{
    CalculationRecord, CalculationRepositoryTrait, CalculationSearchRequest,
    CalculationSearchResponse, CalculationSummary, CommissionError, NewCalculationRecord,
};
use feecalc_core::errors::{Error, Result};

use super::model::{CalculationRecordDB, CalculationSummaryDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::calculation_records;

/// Append-only calculation history backed by SQLite.
pub struct CalculationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CalculationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_by_file_name(
    conn: &mut SqliteConnection,
    file_name: &str,
) -> Result<Option<CalculationRecordDB>> {
    calculation_records::table
        .filter(calculation_records::file_name.eq(file_name))
        .select(CalculationRecordDB::as_select())
        .first::<CalculationRecordDB>(conn)
        .optional()
        .into_core()
}

fn duplicate_of(existing: &CalculationRecordDB) -> Error {
    CommissionError::DuplicateFile {
        file_name: existing.file_name.clone(),
        record_id: existing.id.clone(),
        created_at: existing.created_at,
    }
    .into()
}

/// Escapes LIKE wildcards so a biller filter matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl CalculationRepositoryTrait for CalculationRepository {
    fn get_by_id(&self, record_id: &str) -> Result<CalculationRecord> {
        let mut conn = get_connection(&self.pool)?;
        let row = calculation_records::table
            .find(record_id)
            .select(CalculationRecordDB::as_select())
            .first::<CalculationRecordDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| CommissionError::RecordNotFound(record_id.to_string()))?;
        CalculationRecord::try_from(row)
    }

    fn find_by_file_name(&self, file_name: &str) -> Result<Option<CalculationRecord>> {
        let mut conn = get_connection(&self.pool)?;
        load_by_file_name(&mut conn, file_name)?
            .map(CalculationRecord::try_from)
            .transpose()
    }

    fn search(&self, request: &CalculationSearchRequest) -> Result<CalculationSearchResponse> {
        let mut conn = get_connection(&self.pool)?;
        let limit = request.effective_limit();
        let offset = request.effective_offset();

        let mut query = calculation_records::table
            .select(CalculationSummaryDB::as_select())
            .into_boxed();

        if let Some(term) = request.search_term() {
            query = query.filter(
                calculation_records::biller_name
                    .like(like_pattern(term))
                    .escape('\\'),
            );
        }

        // Fetch one extra row to know whether another page exists
        let mut rows = query
            .order((
                calculation_records::created_at.desc(),
                calculation_records::id.desc(),
            ))
            .limit(limit + 1)
            .offset(offset)
            .load::<CalculationSummaryDB>(&mut conn)
            .into_core()?;

        let has_more = rows.len() as i64 > limit;
        rows.truncate(limit as usize);

        let items = rows
            .into_iter()
            .map(CalculationSummary::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(CalculationSearchResponse { items, has_more })
    }

    async fn insert_record(&self, new_record: NewCalculationRecord) -> Result<CalculationRecord> {
        let row = CalculationRecordDB::from_new(
            Uuid::now_v7().to_string(),
            Utc::now().naive_utc(),
            &new_record,
        )?;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CalculationRecord> {
                if let Some(existing) = load_by_file_name(conn, &row.file_name)? {
                    return Err(duplicate_of(&existing));
                }

                match diesel::insert_into(calculation_records::table)
                    .values(&row)
                    .execute(conn)
                {
                    Ok(_) => {}
                    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
                        warn!(
                            "Unique violation while storing '{}': {}",
                            row.file_name,
                            info.message()
                        );
                        return match load_by_file_name(conn, &row.file_name)? {
                            Some(existing) => Err(duplicate_of(&existing)),
                            None => Err(Error::Unexpected(format!(
                                "unique violation on '{}' without a matching record",
                                row.file_name
                            ))),
                        };
                    }
                    Err(e) => return Err(StorageError::from(e).into()),
                }

                debug!("Inserted calculation record {}", row.id);
                CalculationRecord::try_from(row)
            })
            .await
    }
}
