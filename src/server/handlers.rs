//! Request handlers and multipart form decoding.

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, Path};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::export::{template_bytes, TemplateKind};
use crate::service::{
    self, RoomSource, SeatingRequest, ServiceError, Upload, DOCUMENT_FILE_NAME,
};
use crate::types::{AllocationOrder, RoomSpec};

use super::error::ApiError;

/// Response header carrying the number of students left without a seat.
pub const UNASSIGNED_COUNT_HEADER: &str = "x-unassigned-count";

/// Response header carrying the number of load warnings on a generated chart.
pub const WARNING_COUNT_HEADER: &str = "x-warning-count";

/// Response header carrying the number of skipped source rows on a generated chart.
pub const ROW_ERROR_COUNT_HEADER: &str = "x-row-error-count";

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Raw fields of a seating form, before validation.
#[derive(Debug, Default)]
pub struct SeatingForm {
    pub students_file: Option<Upload>,
    pub room_matrix_file: Option<Upload>,
    pub allocation_type: Option<String>,
    pub manual_config: bool,
    pub rows: Option<String>,
    pub columns: Option<String>,
    pub students_per_seat: Option<String>,
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

async fn read_upload(field: Field<'_>) -> Result<Option<Upload>, ApiError> {
    let file_name = field.file_name().map(str::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?;
    // An empty part is a placeholder, not a file.
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(Upload::new(file_name, bytes.to_vec())))
}

async fn read_text(field: Field<'_>) -> Result<Option<String>, ApiError> {
    let text = field.text().await.map_err(multipart_error)?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

fn is_truthy(value: &str) -> bool {
    ["true", "1", "on", "yes"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

impl SeatingForm {
    /// Drain a multipart body. Unknown fields are skipped.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "studentsFile" => form.students_file = read_upload(field).await?,
                "roomMatrixFile" => form.room_matrix_file = read_upload(field).await?,
                "allocationType" => form.allocation_type = read_text(field).await?,
                "manualConfig" => {
                    form.manual_config = read_text(field).await?.is_some_and(|v| is_truthy(&v));
                }
                "rows" => form.rows = read_text(field).await?,
                "columns" => form.columns = read_text(field).await?,
                "studentsPerSeat" => form.students_per_seat = read_text(field).await?,
                other => tracing::debug!(field = other, "ignoring unknown form field"),
            }
        }
        Ok(form)
    }

    fn order(&self) -> Result<AllocationOrder, ServiceError> {
        match &self.allocation_type {
            Some(value) => Ok(value.parse()?),
            None => Ok(AllocationOrder::default()),
        }
    }

    fn room_source(&mut self) -> Result<RoomSource, ServiceError> {
        if self.manual_config {
            let rows = parse_dimension("rows", self.rows.as_deref())?;
            let columns = parse_dimension("columns", self.columns.as_deref())?;
            let per_seat = parse_dimension("studentsPerSeat", self.students_per_seat.as_deref())?;
            return Ok(RoomSource::Manual(RoomSpec::new(rows, columns, per_seat)?));
        }
        match self.room_matrix_file.take() {
            Some(upload) => Ok(RoomSource::File(upload)),
            None => Err(ServiceError::validation(
                "either roomMatrixFile or manualConfig with rows, columns and studentsPerSeat is required",
            )),
        }
    }

    /// Validate the form into a pipeline request.
    pub fn into_request(mut self) -> Result<SeatingRequest, ServiceError> {
        let order = self.order()?;
        let rooms = self.room_source()?;
        Ok(SeatingRequest {
            students: self.students_file,
            rooms,
            order,
        })
    }
}

fn parse_dimension(name: &str, value: Option<&str>) -> Result<u32, ServiceError> {
    let value = value.ok_or_else(|| {
        ServiceError::validation(format!("{name} is required for manual configuration"))
    })?;
    value
        .parse::<u32>()
        .map_err(|_| ServiceError::validation(format!("{name} must be a positive integer (got '{value}')")))
}

/// Run a CPU-bound pipeline off the async workers.
async fn run_blocking<T, F>(job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(err) => {
            tracing::error!(error = %err, "pipeline task failed");
            Err(ServiceError::internal().into())
        }
    }
}

async fn read_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<SeatingForm, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        ApiError::bad_request(format!("expected a multipart form: {}", rejection.body_text()))
    })?;
    SeatingForm::read(multipart).await
}

/// `POST /api/seating/preview`
pub async fn preview(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let request = read_form(multipart).await?.into_request()?;
    let response = run_blocking(move || service::preview(&request)).await?;
    Ok(Json(response).into_response())
}

/// `POST /api/seating/generate`
pub async fn generate(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let form = read_form(multipart).await?;
    if form.allocation_type.is_none() {
        return Err(ApiError::bad_request("allocationType is required"));
    }
    let request = form.into_request()?;
    let document = run_blocking(move || service::generate(&request)).await?;

    let disposition = format!("attachment; filename=\"{DOCUMENT_FILE_NAME}\"");
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
        (
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition).map_err(|_| ApiError::from(ServiceError::internal()))?,
        ),
        (
            HeaderName::from_static(UNASSIGNED_COUNT_HEADER),
            HeaderValue::from(document.unassigned),
        ),
        (
            HeaderName::from_static(WARNING_COUNT_HEADER),
            HeaderValue::from(document.warnings.len()),
        ),
        (
            HeaderName::from_static(ROW_ERROR_COUNT_HEADER),
            HeaderValue::from(document.row_errors.len()),
        ),
    ];
    Ok((StatusCode::OK, headers, document.bytes).into_response())
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /api/status`
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /assets/templates/:file`
pub async fn template(Path(file): Path<String>) -> Result<Response, ApiError> {
    let kind = TemplateKind::from_file_name(&file)
        .ok_or_else(|| ApiError::not_found(format!("unknown template: {file}")))?;
    let bytes = template_bytes(kind).map_err(ServiceError::from)?;
    let disposition = format!("attachment; filename=\"{}\"", kind.file_name());
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
        (
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition).map_err(|_| ApiError::from(ServiceError::internal()))?,
        ),
    ];
    Ok((StatusCode::OK, headers, bytes).into_response())
}
