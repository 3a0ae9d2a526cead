//! Error taxonomy shared by every service, and its HTTP mapping.

use axum::{http::StatusCode, Json};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Unknown product, order, batch, sample or barcode
    #[error("{0}")]
    NotFound(String),
    /// Unrecognized status value, malformed quantity, blank required field
    #[error("{0}")]
    InvalidArgument(String),
    /// Duplicate barcode, SKU, batch id or sample key
    #[error("{0}")]
    Conflict(String),
    /// Role not in the allow-list for the operation
    #[error("{0}")]
    PermissionDenied(String),
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::PermissionDenied(_) => "PERMISSION_DENIED",
            ServiceError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        // Unique index races surface here rather than in the up-front checks
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                ServiceError::Conflict(format!("Duplicate value: {}", detail))
            }
            _ => ServiceError::Database(err),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Map a service error to the response tuple every handler returns
pub fn map_service_error(err: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    match &err {
        ServiceError::Database(e) => error!(error = %e, "Database failure"),
        other => warn!(code = other.code(), error = %other, "Request rejected"),
    }

    (
        err.status_code(),
        Json(ErrorResponse {
            error: err.to_string(),
            code: Some(err.code().to_string()),
        }),
    )
}
