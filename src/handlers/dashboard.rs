use axum::{extract::State, http::HeaderMap, Json};
use tracing::debug;

use crate::error::map_service_error;
use crate::handlers::{auth::viewer_from_headers, ApiError};
use crate::models::dashboard::DashboardResponse;
use crate::services::dashboard;
use crate::AppState;

/// GET /
pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, ApiError> {
    let viewer = viewer_from_headers(&headers);
    debug!(role = %viewer.role(), "Dashboard request received");

    let response = dashboard::dashboard(&state.db, &viewer)
        .await
        .map_err(map_service_error)?;

    Ok(Json(response))
}
