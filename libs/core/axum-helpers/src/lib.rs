//! # Axum Helpers
//!
//! Shared plumbing for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: router assembly, API docs, health/readiness, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: JSON error bodies with stable error codes
//! - **[`extractors`]**: UUID path, validated JSON and query extractors
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig, FromEnv};
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let router = create_router::<ApiDoc>(Router::new())?
//!         .merge(health_router(app_info!()));
//!
//!     let server = ServerConfig::from_env().map_err(std::io::Error::other)?;
//!     create_production_app(router, &server, Duration::from_secs(10), async {})
//!         .await
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, ready_router, run_health_checks, serve_until_shutdown, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{QueryParams, UuidPath, ValidatedJson};
