//! Application settings read from the environment.
//!
//! `.env` is loaded first (non-fatal when absent), then each setting falls back to a
//! development default. Only `JWT_SECRET` has no default.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    /// Local development, relaxed CORS
    Development,
    /// Automated tests
    Test,
    /// Production deployment
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Runtime stage
    pub environment: AppEnvironment,
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// `SeaORM` connection URL
    pub database_url: String,
    /// HMAC secret used to sign access tokens
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub jwt_ttl_secs: i64,
    /// Emit all-zero dashboard rows for properties without transactions
    pub dashboard_zero_fill: bool,
    /// Path of the optional catalog file
    pub catalog_path: String,
}

impl AppConfig {
    /// Loads `.env` and reads the configuration from the process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment =
            AppEnvironment::parse(&lookup("APP_ENV").unwrap_or_else(|| "development".to_string()));
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("APP_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| Error::Config {
                message: format!("APP_PORT is not a valid port: {e}"),
            })?;
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| Error::Config {
                message: "JWT_SECRET must be set".to_string(),
            })?;
        let jwt_ttl_secs = lookup("JWT_TTL_SECS")
            .unwrap_or_else(|| "86400".to_string())
            .parse::<i64>()
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or_else(|| Error::Config {
                message: "JWT_TTL_SECS must be a positive number of seconds".to_string(),
            })?;
        let dashboard_zero_fill = lookup("DASHBOARD_ZERO_FILL")
            .is_some_and(|value| matches!(value.trim(), "1" | "true" | "yes"));
        let catalog_path = lookup("CATALOG_PATH").unwrap_or_else(|| "config.toml".to_string());

        Ok(Self {
            environment,
            host,
            port,
            database_url,
            jwt_secret,
            jwt_ttl_secs,
            dashboard_zero_fill,
            catalog_path,
        })
    }

    /// Resolves the socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|e| Error::Config {
            message: format!("APP_HOST is not a valid address: {e}"),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Browser origins allowed to call the API.
    #[must_use]
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec!["https://example.com".to_string()];
        if self.environment == AppEnvironment::Development {
            origins.push("http://localhost:3000".to_string());
        }
        origins
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_secret() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.jwt_ttl_secs, 86400);
        assert!(!config.dashboard_zero_fill);
        assert_eq!(config.allowed_origins().len(), 2);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result =
            AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("APP_PORT", "http")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_production_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "x"),
            ("APP_ENV", "production"),
            ("APP_HOST", "localhost"),
            ("APP_PORT", "9000"),
            ("DASHBOARD_ZERO_FILL", "true"),
        ]))
        .unwrap();
        assert_eq!(config.environment, AppEnvironment::Production);
        assert!(config.dashboard_zero_fill);
        assert_eq!(config.allowed_origins(), vec!["https://example.com".to_string()]);
        assert_eq!(config.socket_addr().unwrap().port(), 9000);
    }
}
