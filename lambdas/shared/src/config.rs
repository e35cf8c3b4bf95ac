//! Environment configuration
//!
//! Secrets (JWT signing key, upstream API keys) are injected into the Lambda
//! environment at deploy time. Each function only requires what it uses, so
//! the upstream keys are optional here and checked by the client that needs them.

use crate::errors::{Error, Result};
use crate::tokens::TokenIssuer;

const TABLE_NAME_ENV: &str = "BERKELEY_MOBILE_TABLE";
const DEFAULT_TABLE_NAME: &str = "berkeley-mobile";
const JWT_SECRET_ENV: &str = "JWT_SECRET";
const TRANSIT_API_KEY_ENV: &str = "TRANSIT_API_KEY";
const TRANSIT_API_URL_ENV: &str = "TRANSIT_API_URL";
const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";
const WEATHER_API_URL_ENV: &str = "WEATHER_API_URL";

pub const DEFAULT_TRANSIT_API_URL: &str = "http://api.actransit.org/transit";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/onecall";

/// Runtime configuration for a Lambda function
#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub jwt_secret: Option<String>,
    pub transit_api_key: Option<String>,
    pub transit_api_url: String,
    pub weather_api_key: Option<String>,
    pub weather_api_url: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            table_name: non_empty(TABLE_NAME_ENV).unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            jwt_secret: non_empty(JWT_SECRET_ENV),
            transit_api_key: non_empty(TRANSIT_API_KEY_ENV),
            transit_api_url: non_empty(TRANSIT_API_URL_ENV)
                .unwrap_or_else(|| DEFAULT_TRANSIT_API_URL.to_string()),
            weather_api_key: non_empty(WEATHER_API_KEY_ENV),
            weather_api_url: non_empty(WEATHER_API_URL_ENV)
                .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string()),
        }
    }

    /// Token issuer built from the JWT secret
    pub fn token_issuer(&self) -> Result<TokenIssuer> {
        let secret = require(&self.jwt_secret, JWT_SECRET_ENV)?;
        Ok(TokenIssuer::new(secret.as_bytes()))
    }

    pub fn transit_api_key(&self) -> Result<&str> {
        require(&self.transit_api_key, TRANSIT_API_KEY_ENV)
    }

    pub fn weather_api_key(&self) -> Result<&str> {
        require(&self.weather_api_key, WEATHER_API_KEY_ENV)
    }
}

fn require<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::Config(format!("{} is not set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.table_name, "berkeley-mobile");
        assert_eq!(config.transit_api_url, DEFAULT_TRANSIT_API_URL);
        assert_eq!(config.weather_api_url, DEFAULT_WEATHER_API_URL);
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let config = config_from(&[("JWT_SECRET", "  ")]);
        let err = config.token_issuer().err().unwrap();
        assert_eq!(err.code(), "config_error");
        assert!(err.to_string().contains("JWT_SECRET"));

        assert!(config.transit_api_key().is_err());
        assert!(config.weather_api_key().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BERKELEY_MOBILE_TABLE", "bm-test"),
            ("JWT_SECRET", "s3cret"),
            ("TRANSIT_API_KEY", "transit-key"),
            ("TRANSIT_API_URL", "http://localhost:9000/transit"),
        ]);
        assert_eq!(config.table_name, "bm-test");
        assert!(config.token_issuer().is_ok());
        assert_eq!(config.transit_api_key().unwrap(), "transit-key");
        assert_eq!(config.transit_api_url, "http://localhost:9000/transit");
    }
}
