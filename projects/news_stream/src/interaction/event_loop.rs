use thiserror::Error;
use tracing::{info, warn};

use crate::db::NewsStore;
use crate::ingest::{fetch_and_store, ArticleSource, BatchReport, DuplicatePolicy, ErrorKind, IngestError};
use crate::interaction::window::{Event, Window};

pub const INPUT_TOPIC: &str = "Input Topic";
pub const NO_TOPIC: &str = "Please enter a topic for news";
pub const NO_NEWS_FOUND: &str = "No News Found";
pub const DUPLICATED_ARTICLES: &str =
    "The news topic has duplicated articles please choose a different topic";

/// How the loop ended.
#[derive(Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// A topic was fetched and stored.
    Done { topic: String, report: BatchReport },
    /// The window was closed first.
    Closed,
}

#[derive(Debug, Error)]
pub enum EventLoopError {
    #[error("Window: {source}")]
    Window {
        #[from]
        source: std::io::Error,
    },

    #[error("Ingest: {source}")]
    Ingest {
        source: IngestError,
    },
}

/// Runs the form until a topic is stored or the window is closed.
///
/// Fetching and persisting happen inline, so the form does not take input
/// while a batch is in flight. API, type and duplicate failures are reported
/// and the form waits for another topic; anything else ends the loop.
pub async fn run<W: Window, S: ArticleSource>(
    window: &mut W,
    source: &S,
    store: &NewsStore,
    policy: DuplicatePolicy,
) -> Result<LoopExit, EventLoopError> {
    loop {
        let topic = match window.read()? {
            Event::Closed => {
                info!("window closed");
                return Ok(LoopExit::Closed);
            }
            Event::Submit(topic) => topic,
        };

        if topic.trim().is_empty() {
            window.popup_error(INPUT_TOPIC)?;
            continue;
        }

        match fetch_and_store(source, store, &topic, policy).await {
            Ok(report) => {
                window.popup_auto_close(&format!("Data Inserted topic: {topic}"))?;
                info!(%topic, inserted = report.inserted, "topic stored");
                return Ok(LoopExit::Done { topic, report });
            }
            Err(err) => {
                let message = match err.kind() {
                    ErrorKind::Api => NO_TOPIC,
                    ErrorKind::Type => NO_NEWS_FOUND,
                    ErrorKind::Duplicate => DUPLICATED_ARTICLES,
                    ErrorKind::Fatal => return Err(EventLoopError::Ingest { source: err }),
                };
                warn!(%topic, error = %err, "topic rejected");
                window.popup_error(message)?;
            }
        }
    }
}
