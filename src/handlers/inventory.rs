//! Inventory endpoints under /inventory/

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use tracing::{info, warn};

use crate::access::Operation;
use crate::entities::{inventory_batches, inventory_samples};
use crate::error::{map_service_error, ServiceError};
use crate::handlers::{auth::viewer_from_headers, ApiError, ApiJson, ApiQuery};
use crate::models::inventory::{
    AllocateSampleRequest, BatchDetailResponse, BatchListQuery, BatchListResponse,
    BatchStatusRequest, BatchStatusResponse, CreateBatchRequest, CreateSampleRequest,
    QualityCheckRequest, SampleDetailResponse, SampleScanQuery, SampleScanResponse,
    SampleStatusRequest,
};
use crate::services::inventory as inventory_service;
use crate::AppState;

/// GET /inventory/batches/?batch_type=&status=
pub async fn list_batches(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<BatchListQuery>,
) -> Result<Json<BatchListResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);

    let batches = inventory_service::list_batches(&state.db, &viewer, &query)
        .await
        .map_err(map_service_error)?;

    Ok(Json(BatchListResponse { batches }))
}

/// POST /inventory/batches/
pub async fn create_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<CreateBatchRequest>,
) -> Result<Json<inventory_batches::Model>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(
        correlation_id = %correlation_id,
        batch_id = %payload.batch_id,
        actor = ?viewer.actor(),
        "Batch creation requested"
    );

    let batch = inventory_service::create_batch(&state.db, &viewer, &payload)
        .await
        .map_err(map_service_error)?;

    Ok(Json(batch))
}

/// GET /inventory/batches/{id}/
pub async fn get_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<BatchDetailResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);

    let detail = inventory_service::batch_detail(&state.db, &viewer, id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(detail))
}

/// POST /inventory/batches/{id}/status/
pub async fn update_batch_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<BatchStatusRequest>,
) -> Result<Json<BatchStatusResponse>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(
        correlation_id = %correlation_id,
        batch = id,
        status = %payload.status,
        "Batch status update requested"
    );

    let response = inventory_service::update_batch_status(&state.db, &viewer, id, &payload.status)
        .await
        .map_err(map_service_error)?;

    Ok(Json(response))
}

/// POST /inventory/batches/{id}/samples/
pub async fn create_sample(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<CreateSampleRequest>,
) -> Result<Json<inventory_samples::Model>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(
        correlation_id = %correlation_id,
        batch = id,
        sample_number = %payload.sample_number,
        "Sample registration requested"
    );

    let sample = inventory_service::create_sample(&state.db, &viewer, id, &payload)
        .await
        .map_err(map_service_error)?;

    Ok(Json(sample))
}

/// GET /inventory/samples/{id}/
pub async fn get_sample(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<SampleDetailResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);

    let detail = inventory_service::sample_detail(&state.db, &viewer, id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(detail))
}

/// POST /inventory/samples/{id}/status/
pub async fn update_sample_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<SampleStatusRequest>,
) -> Result<Json<inventory_samples::Model>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(
        correlation_id = %correlation_id,
        sample_id = id,
        status = %payload.status,
        "Sample status update requested"
    );

    let sample = inventory_service::update_sample_status(&state.db, &viewer, id, &payload.status)
        .await
        .map_err(map_service_error)?;

    Ok(Json(sample))
}

/// POST /inventory/samples/{id}/quality-check/
pub async fn quality_check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<QualityCheckRequest>,
) -> Result<Json<inventory_samples::Model>, ApiError> {
    let viewer = viewer_from_headers(&headers);

    let sample = inventory_service::quality_check(&state.db, &viewer, id, payload.notes.as_deref())
        .await
        .map_err(map_service_error)?;

    Ok(Json(sample))
}

/// POST /inventory/samples/{id}/allocate/
pub async fn allocate_sample(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<AllocateSampleRequest>,
) -> Result<Json<inventory_samples::Model>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(
        correlation_id = %correlation_id,
        sample_id = id,
        order_id = payload.order_id,
        "Sample allocation requested"
    );

    let sample = inventory_service::allocate_sample(&state.db, &viewer, id, payload.order_id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(sample))
}

/// GET /inventory/scan/?barcode=
///
/// Like the order scan page, a miss is reported in the body.
pub async fn scan_sample(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<SampleScanQuery>,
) -> Result<Json<SampleScanResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);

    let Some(barcode) = query
        .barcode
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
    else {
        viewer
            .authorize(Operation::ScanSample)
            .map_err(map_service_error)?;
        return Ok(Json(SampleScanResponse::default()));
    };

    match inventory_service::scan_sample(&state.db, &viewer, barcode).await {
        Ok(sample) => Ok(Json(SampleScanResponse {
            sample: Some(sample),
            error: None,
        })),
        Err(ServiceError::NotFound(message)) => {
            warn!(barcode = %barcode, "Scan did not match any sample");
            Ok(Json(SampleScanResponse {
                sample: None,
                error: Some(message),
            }))
        }
        Err(err) => Err(map_service_error(err)),
    }
}
