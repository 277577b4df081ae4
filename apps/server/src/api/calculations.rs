use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use feecalc_core::{
    CalculationSearchRequest, CalculationSearchResponse, FormattedCalculation, SchemeType,
    SchemeWorkbook,
};

fn upload_error(err: MultipartError) -> ApiError {
    ApiError::Upload {
        status: err.status(),
        message: format!("Failed to read upload: {}", err.body_text()),
    }
}

/// Browsers may send a full client path; only the final component is the file name.
fn client_file_name(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim().to_string()
}

async fn submit_calculation(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<FormattedCalculation>)> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut scheme_type: Option<String> = None;
    let mut submitted_by: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(client_file_name).unwrap_or_default();
                let content = field.bytes().await.map_err(upload_error)?.to_vec();
                upload = Some((file_name, content));
            }
            "schemeType" => scheme_type = Some(field.text().await.map_err(upload_error)?),
            "submittedBy" => submitted_by = Some(field.text().await.map_err(upload_error)?),
            _ => {}
        }
    }

    let (file_name, content) = upload
        .ok_or_else(|| ApiError::BadRequest("Missing file in multipart request".to_string()))?;
    if file_name.is_empty() {
        return Err(ApiError::BadRequest(
            "Uploaded file has no file name".to_string(),
        ));
    }
    let scheme_type: SchemeType = scheme_type
        .ok_or_else(|| ApiError::BadRequest("Missing schemeType".to_string()))?
        .parse()?;
    let submitted_by = submitted_by.unwrap_or_default();

    let record = state
        .calculation_service
        .submit_calculation(
            SchemeWorkbook::new(file_name, content, scheme_type),
            &submitted_by,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record.formatted())))
}

async fn get_calculation(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<FormattedCalculation>> {
    let record = state.calculation_service.get_calculation(&id)?;
    Ok(Json(record.formatted()))
}

async fn search_calculations(
    State(state): State<Arc<AppState>>,
    Query(request): Query<CalculationSearchRequest>,
) -> ApiResult<Json<CalculationSearchResponse>> {
    let response = state.calculation_service.search_calculations(&request)?;
    Ok(Json(response))
}

async fn export_calculation(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let csv = state.calculation_service.export_calculation(&id)?;
    let disposition = format!("attachment; filename=\"calculation-{}.csv\"", id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/calculations",
            get(search_calculations).post(submit_calculation),
        )
        .route("/calculations/{id}", get(get_calculation))
        .route("/calculations/{id}/export", get(export_calculation))
}
