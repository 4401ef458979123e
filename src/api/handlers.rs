//! API request handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::error::{OrderError, OrderResult};
use crate::excel::{export_order, ExportedOrder, OrderWorkbook, XLSX_CONTENT_TYPE};
use crate::types::OrderRequest;

pub const NO_ITEMS_MESSAGE: &str = "No items provided";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to generate Excel file";
pub const OUT_OF_RANGE_MESSAGE: &str = "Order totals are too large";

/// Standard API response wrapper for the informational endpoints
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data,
        }
    }
}

/// Error body of `POST /export-excel`
#[derive(Serialize, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(RootResponse {
        name: "Order Forge".to_string(),
        version: state.version.clone(),
        description: "Order export: line items to a priced .xlsx workbook".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new("/export-excel", "POST", "Export order items to Excel"),
        ],
    }))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: state.version.clone(),
    }))
}

/// POST /export-excel - Build the order workbook
///
/// 400 for a missing/empty item list, an unreadable body or totals that do not
/// fit a number, 500 when the workbook cannot be produced. Per-item photo
/// problems never fail the request.
pub async fn export_excel(payload: Result<Json<OrderRequest>, JsonRejection>) -> Response {
    let request_id = Uuid::new_v4();

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(%request_id, error = %rejection, "rejected export request body");
            let status = match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return error_response(status, INVALID_BODY_MESSAGE);
        }
    };

    if request.items.is_empty() {
        warn!(%request_id, "export requested without items");
        return error_response(StatusCode::BAD_REQUEST, NO_ITEMS_MESSAGE);
    }

    let item_count = request.items.len();
    let started = Instant::now();
    let built = tokio::task::spawn_blocking(move || {
        export_order(&request.items, &OrderWorkbook::new())
    })
    .await;

    match built {
        Ok(result) => export_response(request_id, item_count, started, result),
        Err(e) => {
            error!(%request_id, error = %e, "export task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, EXPORT_FAILED_MESSAGE)
        }
    }
}

/// Map a finished export to the HTTP response: the attachment on success,
/// 400 for input the engine refuses, 500 otherwise
fn export_response(
    request_id: Uuid,
    item_count: usize,
    started: Instant,
    result: OrderResult<ExportedOrder>,
) -> Response {
    match result {
        Ok(exported) => {
            info!(
                %request_id,
                items = item_count,
                failed_photos = exported.report.failed_photos(),
                bytes = exported.bytes.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "order exported"
            );
            let disposition = format!("attachment; filename=\"{}\"", exported.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                exported.bytes,
            )
                .into_response()
        }
        Err(OrderError::EmptyInput) => error_response(StatusCode::BAD_REQUEST, NO_ITEMS_MESSAGE),
        Err(e @ OrderError::OutOfRange(_)) => {
            warn!(%request_id, error = %e, "order totals out of range");
            error_response(StatusCode::BAD_REQUEST, OUT_OF_RANGE_MESSAGE)
        }
        Err(e) => {
            error!(%request_id, error = %e, "Error generating Excel");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, EXPORT_FAILED_MESSAGE)
        }
    }
}
