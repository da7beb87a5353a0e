//! Configuration for Store API

use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://db:27017")),
                ("MONGO_URL", None),
                ("DATABASE_URL", None),
                ("MONGODB_DATABASE", Some("catalogue")),
                ("PORT", Some("9090")),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();

                assert_eq!(config.mongodb.url(), "mongodb://db:27017");
                assert_eq!(config.mongodb.database(), "catalogue");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.environment, Environment::Production);
                assert_eq!(config.app.name, "store_api");
            },
        );
    }

    #[test]
    fn test_config_requires_mongodb_url() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL", "DATABASE_URL"], || {
            assert!(Config::from_env().is_err());
        });
    }
}
