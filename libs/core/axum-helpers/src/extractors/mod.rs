//! Extractors whose rejections render as [`ErrorResponse`](crate::errors::ErrorResponse) JSON.

pub mod query;
pub mod uuid_path;
pub mod validated_json;

pub use query::QueryParams;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
