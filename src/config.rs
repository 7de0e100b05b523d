use anyhow::{Context, anyhow, bail};
use dotenvy::dotenv;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::Level;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub db_max_connections: u32,

    // Rate limiting
    pub rate_api_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{key} must be set"));

        let config = Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api/v1".to_string()),
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            rate_api_per_min: parsed(&lookup, "RATE_API_PER_MIN", 1000)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parsed(&lookup, "LOG_LEVEL", Level::DEBUG)?,
        };

        if config.db_max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if config.rate_api_per_min == 0 {
            bail!("RATE_API_PER_MIN must be at least 1");
        }
        Ok(config)
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid {key}: {raw:?}")),
    }
}
