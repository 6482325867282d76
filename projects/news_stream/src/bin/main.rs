use std::io;

use projects_news_stream::config::{Config, ConfigError};
use projects_news_stream::db::{NewsStore, OpenStoreError};
use projects_news_stream::ingest::NewsApiSource;
use projects_news_stream::interaction::event_loop::{self, EventLoopError, LoopExit};
use projects_news_stream::interaction::window::{TerminalWindow, WINDOW_TITLE};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("LoadConfig: {source}")]
    LoadConfig {
        #[source]
        source: ConfigError,
    },
    #[error("OpenStore: {source}")]
    OpenStore {
        #[source]
        source: OpenStoreError,
    },
    #[error("BuildHttpClient: {source}")]
    BuildHttpClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("EventLoop: {source}")]
    EventLoop {
        #[source]
        source: EventLoopError,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), MainError> {
    utils_trace::init("info")
        .map_err(|source| MainError::TracingInit { source })?;

    let config = Config::from_env()
        .map_err(|source| MainError::LoadConfig { source })?;

    let store = NewsStore::open(&config.database_url, config.db_pool_size, config.db_connect_timeout)
        .map_err(|source| MainError::OpenStore { source })?;

    let source = NewsApiSource::from_config(&config)
        .map_err(|source| MainError::BuildHttpClient { source })?;

    let mut window = TerminalWindow::new(io::stdin().lock(), io::stdout(), WINDOW_TITLE);

    let exit = event_loop::run(&mut window, &source, &store, config.on_duplicate)
        .await
        .map_err(|source| MainError::EventLoop { source })?;

    match exit {
        LoopExit::Done { topic, report } => info!(
            %topic,
            inserted = report.inserted,
            skipped = report.skipped.len(),
            source = source.source(),
            "done"
        ),
        LoopExit::Closed => info!("closed without storing"),
    }

    store.close();
    Ok(())
}
