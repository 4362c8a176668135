//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable              | Default                  |
//! |-----------------------|--------------------------|
//! | `HTTP_PORT`           | `8080`                   |
//! | `DATABASE_PATH`       | `./storefront.db`        |
//! | `DB_MAX_CONNECTIONS`  | `5`                      |
//! | `JWT_SECRET`          | development secret       |
//! | `JWT_ISSUER`          | `storefront-api`         |
//! | `JWT_AUDIENCE`        | `storefront-clients`     |
//! | `JWT_LIFETIME_SECS`   | `86400` (one day)        |
//! | `SEED_DEMO_DATA`      | `false`                  |

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Longest accepted token lifetime: one year.
pub const MAX_JWT_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

/// Storefront API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Upper bound of the connection pool
    pub db_max_connections: u32,

    /// JWT secret key for signing tokens
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// `iss` claim written into and required from every token
    pub jwt_issuer: String,

    /// `aud` claim written into and required from every token
    pub jwt_audience: String,

    /// Token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Insert demo users and products into an empty database at startup
    pub seed_demo_data: bool,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: parse_var("HTTP_PORT", "8080")?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./storefront.db".to_string()),

            db_max_connections: parse_var("DB_MAX_CONNECTIONS", "5")?,

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "storefront-dev-secret-change-in-production".to_string()
            }),

            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront-api".to_string()),

            jwt_audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "storefront-clients".to_string()),

            jwt_lifetime_secs: parse_var("JWT_LIFETIME_SECS", "86400")?,

            seed_demo_data: parse_var("SEED_DEMO_DATA", "false")?,
        };

        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        check_jwt_lifetime(config.jwt_lifetime_secs)?;

        Ok(config)
    }

    /// Settings for tests and local experiments: in-memory database, fixed secret.
    pub fn for_tests() -> Self {
        ApiConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            db_max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            jwt_issuer: "storefront-api".to_string(),
            jwt_audience: "storefront-clients".to_string(),
            jwt_lifetime_secs: 3600,
            seed_demo_data: false,
        }
    }
}

fn check_jwt_lifetime(secs: i64) -> Result<(), ConfigError> {
    if (1..=MAX_JWT_LIFETIME_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))
    }
}

fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default() {
        let port: u16 = parse_var("STOREFRONT_TEST_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_var_invalid_names_variable() {
        let err = parse_var::<u16>("STOREFRONT_TEST_UNSET_PORT", "not-a-port").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for STOREFRONT_TEST_UNSET_PORT");
    }

    #[test]
    fn test_jwt_lifetime_bounds() {
        assert!(check_jwt_lifetime(86_400).is_ok());
        assert!(check_jwt_lifetime(MAX_JWT_LIFETIME_SECS).is_ok());
        assert!(check_jwt_lifetime(0).is_err());
        assert!(check_jwt_lifetime(MAX_JWT_LIFETIME_SECS + 1).is_err());
        assert!(check_jwt_lifetime(i64::MAX).is_err());
    }

    #[test]
    fn test_secret_not_serialized() {
        let json = serde_json::to_value(ApiConfig::for_tests()).unwrap();
        assert!(json.get("jwt_secret").is_none());
        assert_eq!(json["jwt_lifetime_secs"], 3600);
    }
}
