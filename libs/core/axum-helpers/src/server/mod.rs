//! Server bootstrap: router assembly with API docs, health and readiness
//! endpoints, graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes)?;
//! let app = router.merge(health_router(app_info!()));
//! create_production_app(app, &server_config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router, serve_until_shutdown};
pub use health::{
    HealthCheckFuture, HealthResponse, health_router, ready_router, run_health_checks,
};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
