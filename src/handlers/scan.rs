//! Barcode scanning for orders.
//!
//! An unknown barcode is not an HTTP error here: the scan page renders the
//! miss as a message and stays usable for the next scan.

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use tracing::{info, warn};

use crate::access::{Operation, Viewer};
use crate::error::{map_service_error, ServiceError};
use crate::handlers::{auth::viewer_from_headers, ApiError, ApiJson, ApiQuery};
use crate::models::order::{ScanRequest, ScanResponse};
use crate::services::orders as order_service;
use crate::AppState;

async fn scan(
    state: &AppState,
    viewer: &Viewer,
    request: ScanRequest,
) -> Result<Json<ScanResponse>, ApiError> {
    let barcode = match request.barcode.as_deref().map(str::trim) {
        Some(barcode) if !barcode.is_empty() => barcode.to_string(),
        // Nothing scanned yet
        _ => {
            viewer
                .authorize(Operation::ScanBarcode)
                .map_err(map_service_error)?;
            return Ok(Json(ScanResponse::default()));
        }
    };

    match order_service::scan_barcode(&state.db, viewer, &barcode).await {
        Ok(order) => {
            info!(order_id = order.id, barcode = %barcode, "Scan matched order");
            Ok(Json(ScanResponse {
                order: Some(order),
                error: None,
            }))
        }
        Err(ServiceError::NotFound(message)) => {
            warn!(barcode = %barcode, "Scan did not match any order");
            Ok(Json(ScanResponse {
                order: None,
                error: Some(message),
            }))
        }
        Err(err) => Err(map_service_error(err)),
    }
}

/// GET /scan/?barcode=
pub async fn scan_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(request): ApiQuery<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);
    scan(&state, &viewer, request).await
}

/// POST /scan/ with `{"barcode": "..."}`
pub async fn scan_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);
    scan(&state, &viewer, request).await
}
