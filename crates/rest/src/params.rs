//! Request extractors and parameter parsing.
//!
//! The extractors mirror axum's own but reject with [`ApiError::Input`], so a
//! malformed path, query or body goes through the same error pipeline as
//! every other failure.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::ApiError;

pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(x)| ApiPath(x))
            .map_err(|e| ApiError::input(e.body_text()))
    }
}

pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::try_from_uri(&parts.uri)
            .map(|Query(x)| ApiQuery(x))
            .map_err(|e| ApiError::input(e.body_text()))
    }
}

pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(x)| ApiJson(x))
            .map_err(|e| ApiError::input(e.body_text()))
    }
}

/// The `at` query parameter carried by root-level routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AtParams {
    pub at: Option<String>,
}

/// Parses a non-negative integer parameter, failing with `error_message` when
/// it is missing or not an integer.
pub fn parse_number(value: Option<&str>, error_message: &str) -> Result<u64, ApiError> {
    let Some(value) = value else {
        return Err(ApiError::input(error_message));
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::input(error_message));
    }

    value.parse().map_err(|_| ApiError::input(error_message))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    /// Parses an inclusive `start-end` range of at most `max` blocks.
    pub fn parse(value: Option<&str>, max: u64) -> Result<Self, ApiError> {
        let Some(value) = value else {
            return Err(ApiError::input("range query parameter must be provided"));
        };

        let Some((start, end)) = value.split_once('-') else {
            return Err(ApiError::input(
                "Incorrect range format. Expected example: 0-999",
            ));
        };

        let start = parse_number(Some(start), "Inputted min value for range must be an unsigned integer.")?;
        let end = parse_number(Some(end), "Inputted max value for range must be an unsigned integer.")?;

        if start > end {
            return Err(ApiError::input(format!(
                "Inputted min value cannot be greater than or equal to the max value. Received {start}-{end}"
            )));
        }

        if end - start >= max {
            return Err(ApiError::input(format!(
                "Inputted range is greater than the {max} range limit."
            )));
        }

        Ok(Self { start, end })
    }

    pub fn heights(&self) -> impl Iterator<Item = u64> {
        self.start..=self.end
    }
}
