use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::{map_service_error, ErrorResponse, ServiceError};

pub mod auth;
pub mod dashboard;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod scan;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn invalid_argument(message: String) -> ApiError {
    map_service_error(ServiceError::InvalidArgument(message))
}

/// JSON body whose parse failures answer 400 `INVALID_ARGUMENT`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected_body(rejection)),
        }
    }
}

fn rejected_body(rejection: JsonRejection) -> ApiError {
    invalid_argument(format!("Invalid request body: {}", rejection.body_text()))
}

/// Query string whose parse failures answer 400 `INVALID_ARGUMENT`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected_query(rejection)),
        }
    }
}

fn rejected_query(rejection: QueryRejection) -> ApiError {
    invalid_argument(format!("Invalid query string: {}", rejection.body_text()))
}
