use mongodb::{Client, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Connects to `url` with the default pool settings and database.
///
/// ```ignore
/// let client = database::mongodb::connect("mongodb://localhost:27017").await?;
/// ```
pub async fn connect(url: &str) -> DatabaseResult<Client> {
    connect_from_config(&MongoConfig::new(url)).await
}

/// Builds a client from `config` and verifies it with a `ping`.
///
/// The driver connects lazily, so without the ping a bad URL or an
/// unreachable server would only show up on the first request.
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    info!(url = %config.redacted_url(), "Connecting to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!(database = %config.database, "Connected to MongoDB");
    Ok(client)
}

/// [`connect`] with backoff. `None` uses [`RetryConfig::for_startup`].
pub async fn connect_with_retry(
    url: &str,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    connect_from_config_with_retry(&MongoConfig::new(url), retry_config).await
}

/// [`connect_from_config`] with backoff. `None` uses [`RetryConfig::for_startup`].
///
/// Meant for process startup only, while the database may still be coming up.
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    retry_with_backoff(
        "mongodb connect",
        || connect_from_config(config),
        retry_config.unwrap_or_else(RetryConfig::for_startup),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let result = connect("not-a-mongodb-url").await;
        assert!(matches!(result, Err(DatabaseError::Mongo(_))));
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect() {
        let mongo_url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let result = connect(&mongo_url).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_connect_with_retry_gives_up_on_unreachable_server() {
        let config = MongoConfig::new("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=100");
        let config = MongoConfig {
            server_selection_timeout_secs: 1,
            connect_timeout_secs: 1,
            ..config
        };
        let retry = RetryConfig::new()
            .with_max_retries(1)
            .with_initial_delay(10)
            .without_jitter();

        let result = connect_from_config_with_retry(&config, Some(retry)).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
    }
}
