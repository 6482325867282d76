//! News topic ingestion
//!
//! - NewsAPI search via `interfaces_newsapi_everything`, wrapped in `ingest/`
//! - SQLite models and queries in `db/`
//! - Terminal form and its event loop in `interaction/`
//! - Requires NEWSAPI_KEY env var for API access

pub mod config;
pub mod db;
pub mod ingest;
pub mod interaction;
pub mod utils;
