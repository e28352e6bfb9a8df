use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE: &str = "epm_bills";
pub const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR \"{value}\": {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

/// Runtime settings, read once before the server starts accepting traffic.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub mongodb_uri: Option<Box<str>>,
    pub mongodb_db: Box<str>,
    /// only its presence is ever reported, the value is not used yet
    pub jwt_secret: Option<Box<str>>,
    pub environment: Box<str>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// builds the config from an arbitrary key lookup. blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>
    {
        let var = |key: &str| -> Option<String> {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let bind = var("BIND_ADDR").unwrap_or_else(|| {
            log::info!("BIND_ADDR not set, using default: {}", DEFAULT_BIND_ADDR);

            DEFAULT_BIND_ADDR.to_owned()
        });
        let bind_addr = bind.parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                source,
            })?;

        let mongodb_db = var("MONGODB_DB")
            .unwrap_or_else(|| DEFAULT_DATABASE.to_owned());
        let environment = var("APP_ENV")
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned());

        Ok(Config {
            bind_addr,
            mongodb_uri: var("MONGODB_URI").map(String::into_boxed_str),
            mongodb_db: mongodb_db.into_boxed_str(),
            jwt_secret: var("JWT_SECRET").map(String::into_boxed_str),
            environment: environment.into_boxed_str(),
        })
    }

    /// names of the variables registration needs that are not set
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.mongodb_uri.is_none() {
            missing.push("MONGODB_URI");
        }

        missing
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(&*config.mongodb_db, DEFAULT_DATABASE);
        assert_eq!(&*config.environment, DEFAULT_ENVIRONMENT);
        assert!(config.mongodb_uri.is_none());
        assert!(config.jwt_secret.is_none());
        assert_eq!(config.missing_required(), vec!["MONGODB_URI"]);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGODB_URI", "   "),
            ("JWT_SECRET", ""),
        ])).unwrap();

        assert!(config.mongodb_uri.is_none());
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn reads_all_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("MONGODB_DB", "bills"),
            ("JWT_SECRET", "secret"),
            ("APP_ENV", "production"),
        ])).unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.mongodb_uri.as_deref(), Some("mongodb://localhost:27017"));
        assert_eq!(&*config.mongodb_db, "bills");
        assert_eq!(config.jwt_secret.as_deref(), Some("secret"));
        assert_eq!(&*config.environment, "production");
        assert!(config.missing_required().is_empty());
    }

    #[test]
    fn rejects_bad_bind_addr() {
        let result = Config::from_lookup(lookup_from(&[("BIND_ADDR", "not an address")]));

        assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
    }
}
