//! Order endpoints
//!
//! - GET    /orders/                     filtered listing
//! - GET    /orders/create/              products for the create form
//! - POST   /orders/create/              create an order
//! - GET    /orders/{id}/                detail with images and scan history
//! - DELETE /orders/{id}/                delete (admin)
//! - POST   /orders/{id}/update-status/  change status
//! - POST   /orders/{id}/notes/          append a note
//! - POST   /orders/{id}/images/         attach an image reference

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use crate::entities::{image_attachments, orders};
use crate::error::map_service_error;
use crate::handlers::{auth::viewer_from_headers, ApiError, ApiJson, ApiQuery};
use crate::models::order::{
    AddNoteRequest, AttachImageRequest, CreateOrderFormResponse, CreateOrderRequest,
    OrderDetailResponse, OrderListQuery, OrderListResponse, UpdateStatusRequest,
};
use crate::services::orders as order_service;
use crate::AppState;

pub async fn list_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<OrderListQuery>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);
    info!(
        role = %viewer.role(),
        status = ?query.status,
        search = ?query.search,
        "Order list request received"
    );

    let orders = order_service::list_orders(
        &state.db,
        &viewer,
        &query,
        state.config.order_list_limit,
    )
    .await
    .map_err(map_service_error)?;

    Ok(Json(OrderListResponse {
        orders,
        selected_status: query.status_filter().map(str::to_string),
    }))
}

pub async fn create_order_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CreateOrderFormResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);

    let form = order_service::create_order_form(&state.db, &viewer)
        .await
        .map_err(map_service_error)?;

    Ok(Json(form))
}

pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<CreateOrderRequest>,
) -> Result<Json<orders::Model>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(
        correlation_id = %correlation_id,
        actor = ?viewer.actor(),
        product_id = payload.product_id,
        "Order creation request received"
    );

    let order = order_service::create_order(&state.db, &viewer, &payload)
        .await
        .map_err(map_service_error)?;

    info!(
        correlation_id = %correlation_id,
        order_id = order.id,
        barcode = %order.barcode,
        "Order creation completed"
    );

    Ok(Json(order))
}

pub async fn get_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetailResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);

    let detail = order_service::order_detail(&state.db, &viewer, id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(detail))
}

pub async fn delete_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(correlation_id = %correlation_id, order_id = id, actor = ?viewer.actor(), "Order deletion requested");

    order_service::delete_order(&state.db, &viewer, id)
        .await
        .map_err(map_service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> Result<Json<orders::Model>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(
        correlation_id = %correlation_id,
        order_id = id,
        status = %payload.status,
        actor = ?viewer.actor(),
        "Order status update requested"
    );

    let order = order_service::update_status(&state.db, &viewer, id, &payload.status)
        .await
        .map_err(map_service_error)?;

    Ok(Json(order))
}

pub async fn add_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<AddNoteRequest>,
) -> Result<Json<orders::Model>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(correlation_id = %correlation_id, order_id = id, actor = ?viewer.actor(), "Order note requested");

    let order = order_service::add_note(&state.db, &viewer, id, &payload.note)
        .await
        .map_err(map_service_error)?;

    Ok(Json(order))
}

pub async fn attach_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<AttachImageRequest>,
) -> Result<Json<image_attachments::Model>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let viewer = viewer_from_headers(&headers);
    info!(correlation_id = %correlation_id, order_id = id, actor = ?viewer.actor(), "Image upload requested");

    let attachment = order_service::attach_image(&state.db, &viewer, id, &payload.image)
        .await
        .map_err(map_service_error)?;

    Ok(Json(attachment))
}
