//! Path and query extractors with JSON rejections
//!
//! `ApiPath<T>` and `ApiQuery<T>` behave like axum's `Path<T>` and
//! `Query<T>`, but a parameter that fails to parse yields an
//! [`ErrorResponse`] body instead of axum's plain-text rejection.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

use super::ErrorResponse;

/// Path parameters, e.g. `ApiPath(id): ApiPath<i64>`.
pub struct ApiPath<T>(pub T);

/// Query string parameters, e.g. `ApiQuery(params): ApiQuery<SearchParams>`.
pub struct ApiQuery<T>(pub T);

/// Rejection for [`ApiPath`] and [`ApiQuery`]. Keeps axum's status code.
#[derive(Debug)]
pub struct ParamsRejection {
    status: StatusCode,
    detail: String,
}

impl From<PathRejection> for ParamsRejection {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ParamsRejection {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ParamsRejection {
    fn into_response(self) -> Response {
        ErrorResponse::new("Invalid request parameters", self.detail)
            .into_response_with(self.status)
    }
}

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ParamsRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ParamsRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}
