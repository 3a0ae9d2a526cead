use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use crate::entities::products;
use crate::error::map_service_error;
use crate::handlers::{auth::viewer_from_headers, ApiError, ApiJson, ApiQuery};
use crate::models::product::{CreateProductRequest, ProductListQuery, ProductListResponse};
use crate::services::products as product_service;
use crate::AppState;

/// GET /products/?search=
pub async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);

    let products = product_service::list_products(&state.db, &viewer, &query)
        .await
        .map_err(map_service_error)?;

    Ok(Json(ProductListResponse { products }))
}

/// POST /products/
pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> Result<Json<products::Model>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(correlation_id = %correlation_id, sku = %payload.sku, actor = ?viewer.actor(), "Product creation requested");

    let product = product_service::create_product(&state.db, &viewer, &payload)
        .await
        .map_err(map_service_error)?;

    Ok(Json(product))
}

/// DELETE /products/{id}/
pub async fn delete_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(correlation_id = %correlation_id, product_id = id, actor = ?viewer.actor(), "Product deletion requested");

    product_service::delete_product(&state.db, &viewer, id)
        .await
        .map_err(map_service_error)?;

    Ok(StatusCode::NO_CONTENT)
}
