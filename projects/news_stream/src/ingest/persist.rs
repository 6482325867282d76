use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::db::news::queries::{insert_news, InsertNewsError};
use crate::db::NewsStore;
use crate::ingest::{ArticleSource, IngestError};
use crate::utils::field_extraction::new_news_from_records;

/// What a batch does when an article URL is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Stop at the first duplicate. Rows committed before it stay.
    #[default]
    Abort,
    /// Leave the stored row alone and carry on with the next article.
    Skip,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(DuplicatePolicy::Abort),
            "skip" => Ok(DuplicatePolicy::Skip),
            other => Err(format!("expected `abort` or `skip`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub inserted: usize,
    pub skipped: Vec<String>,
}

/// Stores `records` one by one, each in its own transaction on its own
/// checked-out connection.
pub fn insert_all(
    store: &NewsStore,
    records: &[Value],
    policy: DuplicatePolicy,
) -> Result<BatchReport, IngestError> {
    let mut report = BatchReport::default();

    info!(records = records.len(), ?policy, "persisting batch");

    for index in 0..records.len() {
        let row = new_news_from_records(records, index)?;
        let mut conn = store.connection()?;

        match insert_news(&mut conn, &row) {
            Ok(_) => {
                debug!(url = %row.url, "inserted news");
                report.inserted += 1;
            }
            Err(InsertNewsError::DuplicateUrl { url }) if policy == DuplicatePolicy::Skip => {
                warn!(%url, "skipping duplicate news");
                report.skipped.push(url);
            }
            Err(source) => return Err(source.into()),
        }
    }

    info!(inserted = report.inserted, skipped = report.skipped.len(), "batch persisted");
    Ok(report)
}

/// Fetches `topic` from `source` and persists whatever comes back.
pub async fn fetch_and_store<S: ArticleSource>(
    source: &S,
    store: &NewsStore,
    topic: &str,
    policy: DuplicatePolicy,
) -> Result<BatchReport, IngestError> {
    let records = source.search(topic).await?;
    insert_all(store, &records, policy)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::news::queries::{count_news, get_news_by_url};
    use crate::db::store::tests::memory_store;
    use crate::ingest::ErrorKind;

    fn article(url: &str, title: &str) -> Value {
        json!({
            "source": {"id": "bloomberg", "name": "Bloomberg"},
            "author": null,
            "title": title,
            "description": "d",
            "url": url,
            "urlToImage": null,
            "publishedAt": "2023-05-01T12:00:00Z",
            "content": "c"
        })
    }

    fn stored(store: &NewsStore) -> i64 {
        count_news(&mut store.connection().unwrap()).unwrap()
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let store = memory_store();
        let report = insert_all(&store, &[], DuplicatePolicy::Abort).unwrap();
        assert_eq!(report, BatchReport::default());
        assert_eq!(stored(&store), 0);
    }

    #[test]
    fn duplicate_aborts_rest_of_batch_but_keeps_earlier_commits() {
        let store = memory_store();
        let records = [
            article("http://example.com/a", "first"),
            article("http://example.com/a", "again"),
            article("http://example.com/c", "never"),
        ];

        let err = insert_all(&store, &records, DuplicatePolicy::Abort).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Duplicate);
        assert_eq!(stored(&store), 1);
        let first = get_news_by_url(&mut store.connection().unwrap(), "http://example.com/a")
            .unwrap()
            .unwrap();
        assert_eq!(first.title.as_deref(), Some("first"));
    }

    #[test]
    fn skip_policy_continues_past_duplicates() {
        let store = memory_store();
        let records = [
            article("http://example.com/a", "first"),
            article("http://example.com/a", "again"),
            article("http://example.com/c", "third"),
        ];

        let report = insert_all(&store, &records, DuplicatePolicy::Skip).unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, vec!["http://example.com/a".to_string()]);
        assert_eq!(stored(&store), 2);
    }

    #[test]
    fn malformed_article_stops_batch_with_type_error() {
        let store = memory_store();
        let mut broken = article("http://example.com/b", "broken");
        broken["publishedAt"] = Value::Null;
        let records = [article("http://example.com/a", "ok"), broken];

        let err = insert_all(&store, &records, DuplicatePolicy::Abort).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(stored(&store), 1);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("abort".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Abort);
        assert_eq!(" Skip ".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Skip);
        assert!("retry".parse::<DuplicatePolicy>().is_err());
    }
}
