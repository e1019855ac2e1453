use core_config::server::ServerConfig;
use core_config::{app_info, AppInfo, ConfigError, Environment, FromEnv};
use database::mongodb::MongoConfig;

/// Everything the service needs at startup, loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub mongo: MongoConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            mongo: MongoConfig::from_env()?,
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
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("events_test")),
                ("PORT", Some("8080")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.mongo.database, "events_test");
                assert_eq!(config.app.name, "geoevents_api");
            },
        );
    }
}
