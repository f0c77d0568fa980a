//! Runtime configuration read from the environment (after `.env` is loaded).

use anyhow::{Context, Result};
use std::str::FromStr;

const DEV_JWT_SECRET: &str = "storefront-dev-secret-change-me";

#[derive(Clone, Debug)]
pub struct Config {
    /// Postgres URL; without it the service keeps everything in memory.
    pub database_url: Option<String>,
    pub port: u16,
    pub nats_url: Option<String>,
    pub jwt_secret: String,
    pub db_max_connections: u32,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None, port: 8083, nats_url: None, jwt_secret: DEV_JWT_SECRET.to_string(),
            db_max_connections: 10, page_size: crate::domain::catalog::DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Builds a config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            defaults.jwt_secret.clone()
        });

        Ok(Self {
            database_url: get("DATABASE_URL"),
            port: parse_or(get("PORT"), "PORT", defaults.port)?,
            nats_url: get("NATS_URL"),
            jwt_secret,
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            page_size: parse_or(get("CATALOG_PAGE_SIZE"), "CATALOG_PAGE_SIZE", defaults.page_size)?.max(1),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v.trim().parse().with_context(|| format!("invalid {key}: {v:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8083);
        assert_eq!(config.page_size, 12);
        assert!(config.database_url.is_none());
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"), ("DATABASE_URL", "  "), ("CATALOG_PAGE_SIZE", "24"), ("JWT_SECRET", "s3cret"),
        ])).unwrap();
        assert_eq!(config.port, 9000);
        assert!(config.database_url.is_none());
        assert_eq!(config.page_size, 24);
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
