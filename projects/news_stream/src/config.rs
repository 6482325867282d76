//! Runtime settings, read once at startup from the environment (or a `.env`
//! file via `dotenvy`).

use std::str::FromStr;
use std::time::Duration;

use interfaces_newsapi_everything::index::DEFAULT_BASE_URL;
use thiserror::Error;

use crate::ingest::DuplicatePolicy;

pub const DEFAULT_SOURCE: &str = "bloomberg";
pub const DEFAULT_DATABASE_URL: &str = "bloomberg_news.db";

#[derive(Debug, Clone)]
pub struct Config {
    /// NewsAPI credential (`NEWSAPI_KEY`).
    pub api_key: String,
    pub api_base_url: String,
    /// Publisher every search is restricted to.
    pub source: String,
    /// Path of the SQLite file.
    pub database_url: String,
    pub db_pool_size: u32,
    /// How long a connection checkout may wait, including the first open.
    pub db_connect_timeout: Duration,
    pub http_timeout: Duration,
    pub on_duplicate: DuplicatePolicy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MissingVar: {name} is not set")]
    MissingVar {
        name: &'static str,
    },

    #[error("InvalidVar: {name}={value}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any name → value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("NEWSAPI_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingVar { name: "NEWSAPI_KEY" })?;

        Ok(Self {
            api_key,
            api_base_url: lookup("NEWSAPI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            source: lookup("NEWS_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_owned()),
            database_url: lookup("NEWS_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            db_pool_size: parse_var(&lookup, "NEWS_DB_POOL_SIZE", 1)?,
            db_connect_timeout: Duration::from_secs(parse_var(&lookup, "NEWS_DB_CONNECT_TIMEOUT_SECS", 5)?),
            http_timeout: Duration::from_secs(parse_var(&lookup, "NEWS_HTTP_TIMEOUT_SECS", 30)?),
            on_duplicate: parse_var(&lookup, "NEWS_ON_DUPLICATE", DuplicatePolicy::Abort)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError::InvalidVar {
            name,
            reason: err.to_string(),
            value,
        }),
    }
}
