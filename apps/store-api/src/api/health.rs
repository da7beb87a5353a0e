//! Readiness check against MongoDB

use axum::Router;
use axum_helpers::server::{HealthCheckFuture, ready_router};
use database::mongodb::check_health_detailed;
use mongodb::Client;

use crate::state::AppState;

fn database_check(client: Client) -> HealthCheckFuture<'static> {
    Box::pin(async move {
        let status = check_health_detailed(&client).await;
        if status.healthy {
            tracing::debug!(response_time_ms = status.response_time_ms, "MongoDB ready");
            Ok(())
        } else {
            Err(status.message.unwrap_or_else(|| "MongoDB ping failed".to_string()))
        }
    })
}

/// `GET /ready`: 200 when MongoDB answers a ping, 503 otherwise.
pub fn router(state: &AppState) -> Router {
    let client = state.mongo_client.clone();
    ready_router(move || vec![("database", database_check(client.clone()))])
}
