//! UUID path parameter extractor with automatic validation.

use crate::errors::{AppError, ErrorCode, error_response};
use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Single `{id}` path segment parsed as a UUID.
///
/// A malformed value is rejected with 400 and code `INVALID_UUID`.
///
/// ```ignore
/// async fn get_product(UuidPath(id): UuidPath) -> String {
///     format!("Product ID: {}", id)
/// }
///
/// let app = Router::new().route("/{id}", get(get_product));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Uuid::parse_str(&raw).map(UuidPath).map_err(|_| {
            tracing::warn!(error_code = ErrorCode::InvalidUuid.code(), value = %raw, "Invalid UUID in path");
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid UUID: {}", raw),
                ErrorCode::InvalidUuid,
            )
        })
    }
}
