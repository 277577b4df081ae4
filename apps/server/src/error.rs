use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use feecalc_core::errors::{DatabaseError, Error as CoreError};
use feecalc_core::{CommissionError, ErrorCategory};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    /// Upload rejected while streaming the multipart body (size limit, broken stream).
    #[error("{message}")]
    Upload { status: StatusCode, message: String },
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<ErrorCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<NaiveDateTime>,
}

fn commission_status(err: &CommissionError) -> StatusCode {
    match (err.category(), err) {
        (_, CommissionError::UnsupportedSchemeType(_)) => StatusCode::NOT_IMPLEMENTED,
        (ErrorCategory::BusinessRule, _) => StatusCode::CONFLICT,
        (ErrorCategory::InputFormat, _) => StatusCode::BAD_REQUEST,
        (ErrorCategory::Consistency, _) => StatusCode::UNPROCESSABLE_ENTITY,
        (ErrorCategory::NotFound, _) => StatusCode::NOT_FOUND,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = ErrorBody {
            code: 0,
            message: self.to_string(),
            category: None,
            record_id: None,
            created_at: None,
        };

        let status = match &self {
            ApiError::Core(CoreError::Commission(e)) => {
                body.category = Some(e.category());
                if let CommissionError::DuplicateFile {
                    record_id,
                    created_at,
                    ..
                } = e
                {
                    body.record_id = Some(record_id.clone());
                    body.created_at = Some(*created_at);
                }
                commission_status(e)
            }
            ApiError::Core(CoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(CoreError::Database(DatabaseError::NotFound(_))) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upload { status, .. } => *status,
            ApiError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        body.code = status.as_u16();
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use feecalc_core::SchemeType;

    #[test]
    fn test_status_per_category() {
        let duplicate = CommissionError::DuplicateFile {
            file_name: "a.xlsx".to_string(),
            record_id: "r1".to_string(),
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        assert_eq!(commission_status(&duplicate), StatusCode::CONFLICT);
        assert_eq!(
            commission_status(&CommissionError::UnsupportedSchemeType(SchemeType::DropPoint)),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            commission_status(&CommissionError::MissingWorksheet),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            commission_status(&CommissionError::RecordNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
    }
}
