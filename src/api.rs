// Data Review - REST API with Axum
//
// Serves the review batch, filtered views of it, and CSV downloads.
// Every route answers non-GET methods with 405 and a JSON message.

use crate::export::{export_csv_today, CSV_MIME};
use crate::filter::{filter_records, FilterParseError, SeverityFilter, StatusFilter};
use crate::record::{Field, Record, ValidationError};
use crate::review::error_summary;
use crate::store::{RecordStore, StoreSummary};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, MethodRouter},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn bad_request(e: FilterParseError) -> ApiError {
    ApiError::BadRequest(e.to_string())
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Filtered view
#[derive(Serialize)]
struct RecordsResponse<'a> {
    status: StatusFilter,
    severity: SeverityFilter,
    total: usize,
    records: Vec<&'a Record>,
}

#[derive(Serialize)]
struct IssueResponse<'a> {
    field: Field,
    #[serde(flatten)]
    error: &'a ValidationError,
}

/// Single record with its error summary
#[derive(Serialize)]
struct RecordDetailResponse<'a> {
    record: &'a Record,
    issues: Vec<IssueResponse<'a>>,
    summary: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ViewQuery {
    status: Option<String>,
    severity: Option<String>,
}

impl ViewQuery {
    fn selectors(&self) -> ApiResult<(StatusFilter, SeverityFilter)> {
        let status = match &self.status {
            Some(s) => s.parse::<StatusFilter>().map_err(bad_request)?,
            None => StatusFilter::All,
        };
        let severity = match &self.severity {
            Some(s) => s.parse::<SeverityFilter>().map_err(bad_request)?,
            None => SeverityFilter::All,
        };
        Ok((status, severity))
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/data - The full batch, `{ records }`
///
/// Serialized straight to bytes so error entries keep their order.
async fn get_data(State(state): State<AppState>) -> ApiResult<Response> {
    let body = serde_json::to_vec(&state.store.to_payload())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// GET /api/records?status=&severity= - Filtered view
async fn get_records(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> ApiResult<Response> {
    let (status, severity) = query.selectors()?;
    let records = filter_records(state.store.records(), status, severity);

    tracing::debug!(%status, %severity, matched = records.len(), "Filtered view");

    Ok(Json(RecordsResponse {
        status,
        severity,
        total: records.len(),
        records,
    })
    .into_response())
}

/// GET /api/records/:id - One record with its error summary
async fn get_record(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let record = state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Record {} not found", id)))?;

    let issues = record
        .issues()
        .map(|(field, error)| IssueResponse { field, error })
        .collect();

    Ok(Json(RecordDetailResponse {
        record,
        issues,
        summary: error_summary(record),
    })
    .into_response())
}

/// GET /api/summary - Counts by status and severity
async fn get_summary(State(state): State<AppState>) -> Json<StoreSummary> {
    Json(state.store.summary())
}

/// GET /api/export?status=&severity= - CSV download of the filtered view
async fn export(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> ApiResult<Response> {
    let (status, severity) = query.selectors()?;
    let export = export_csv_today(state.store.records(), status, severity)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(filename = %export.filename, rows = export.row_count, "CSV export served");

    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        [
            (header::CONTENT_TYPE, CSV_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content,
    )
        .into_response())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    get(handler).fallback(method_not_allowed)
}

// ============================================================================
// Router
// ============================================================================

pub fn router(store: RecordStore) -> Router {
    let state = AppState { store };

    let api_routes = Router::new()
        .route("/health", get_only(health_check))
        .route("/data", get_only(get_data))
        .route("/records", get_only(get_records))
        .route("/records/:id", get_only(get_record))
        .route("/summary", get_only(get_summary))
        .route("/export", get_only(export))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
}
