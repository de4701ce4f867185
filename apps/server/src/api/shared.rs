//! Extractors shared by the API handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

/// The calling owner's id, read from the `x-user-id` header.
///
/// Authentication itself lives in the upstream gateway; by the time a
/// request reaches this service the header is trusted to identify the
/// authenticated user. Every handler scopes its queries by this value.
pub struct Owner(pub String);

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Owner(value.to_string()))
            .ok_or_else(|| ApiError::Unauthorized("missing x-user-id header".to_string()))
    }
}
