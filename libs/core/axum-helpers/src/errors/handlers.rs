use axum::{
    http::{StatusCode, Uri},
    response::Response,
};

use super::{ErrorCode, error_response};

/// Router fallback: JSON 404 naming the path that matched nothing.
pub async fn not_found(uri: Uri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("No route for {}", uri.path()),
        ErrorCode::NotFound,
    )
}

/// JSON 405 for routes that exist under another method.
pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed.default_message().to_string(),
        ErrorCode::MethodNotAllowed,
    )
}
