//! Custom Axum extractors
//!
//! Each one rejects with an `ApiError::Validation` so malformed input is
//! always a 400 with a JSON body.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;
use crate::models::{Priority, TodoId, ValidationError};

/// Extract and validate a todo id from path
pub struct TodoIdPath(pub TodoId);

impl<S> FromRequestParts<S> for TodoIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = id.parse::<TodoId>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: format!("'{}' is not an integer id", id),
            })
        })?;

        Ok(Self(id))
    }
}

/// JSON request body whose rejections are reported as validation errors
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "body",
                reason: rejection.body_text(),
            })
        })?;

        Ok(Self(value))
    }
}

#[derive(Deserialize)]
struct PriorityParams {
    priority: Option<String>,
}

/// Extract and validate `?priority=X`
pub struct PriorityQuery(pub Priority);

impl<S> FromRequestParts<S> for PriorityQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params): Query<PriorityParams> = Query::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "query",
                    reason: rejection.body_text(),
                })
            })?;

        let priority = params
            .priority
            .ok_or(ValidationError::Missing { field: "priority" })?
            .parse::<Priority>()?;

        Ok(Self(priority))
    }
}
