use serde_json::Value;
use thiserror::Error;

use crate::db::news::models::NewNews;

/// Length of the `YYYY-MM-DD` prefix kept from `publishedAt`.
pub const DATE_LEN: usize = 10;

/// Keys of a NewsAPI article record that end up in a news row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleField {
    Author,
    Content,
    Description,
    PublishedAt,
    Source,
    Title,
    Url,
    UrlToImage,
}

impl ArticleField {
    pub const ALL: [ArticleField; 8] = [
        ArticleField::Author,
        ArticleField::Content,
        ArticleField::Description,
        ArticleField::PublishedAt,
        ArticleField::Source,
        ArticleField::Title,
        ArticleField::Url,
        ArticleField::UrlToImage,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ArticleField::Author => "author",
            ArticleField::Content => "content",
            ArticleField::Description => "description",
            ArticleField::PublishedAt => "publishedAt",
            ArticleField::Source => "source",
            ArticleField::Title => "title",
            ArticleField::Url => "url",
            ArticleField::UrlToImage => "urlToImage",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractFieldError {
    #[error("IndexOutOfRange: {index} >= {len}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
    },

    #[error("RecordNotObject: article {index}")]
    RecordNotObject {
        index: usize,
    },

    #[error("MissingKey: article {index} has no `{key}`")]
    MissingKey {
        index: usize,
        key: &'static str,
    },

    /// The row would break the `url` NOT NULL key constraint.
    #[error("NullUrl: article {index} has no url")]
    NullUrl {
        index: usize,
    },

    #[error("TypeMismatch: article {index} `{key}` expected {expected}")]
    TypeMismatch {
        index: usize,
        key: &'static str,
        expected: &'static str,
    },
}

/// Reads one field of `records[index]` as a flat string.
///
/// `publishedAt` is cut to its date and `source` is replaced by its nested
/// `name`. Every other field is returned as-is, `None` when absent or null.
pub fn extract(
    records: &[Value],
    index: usize,
    field: ArticleField,
) -> Result<Option<String>, ExtractFieldError> {
    let record = records
        .get(index)
        .ok_or(ExtractFieldError::IndexOutOfRange { index, len: records.len() })?
        .as_object()
        .ok_or(ExtractFieldError::RecordNotObject { index })?;

    let key = field.key();
    let value = record.get(key);

    match field {
        ArticleField::PublishedAt => {
            let published = value.and_then(Value::as_str).ok_or(ExtractFieldError::TypeMismatch {
                index,
                key,
                expected: "string",
            })?;
            Ok(Some(published.chars().take(DATE_LEN).collect()))
        }
        ArticleField::Source => {
            let name = value
                .and_then(Value::as_object)
                .ok_or(ExtractFieldError::TypeMismatch { index, key, expected: "object" })?
                .get("name")
                .ok_or(ExtractFieldError::MissingKey { index, key: "source.name" })?;
            flat_string(name, index, "source.name")
        }
        _ => match value {
            Some(value) => flat_string(value, index, key),
            None => Ok(None),
        },
    }
}

fn flat_string(
    value: &Value,
    index: usize,
    key: &'static str,
) -> Result<Option<String>, ExtractFieldError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err(ExtractFieldError::TypeMismatch { index, key, expected: "string or null" }),
    }
}

/// Projects `records[index]` onto a news row, extracting all eight fields.
///
/// The url is checked last, so a shape problem in any other field is reported
/// ahead of a missing key.
pub fn new_news_from_records(records: &[Value], index: usize) -> Result<NewNews, ExtractFieldError> {
    let field = |field| extract(records, index, field);

    let author = field(ArticleField::Author)?;
    let content = field(ArticleField::Content)?;
    let description = field(ArticleField::Description)?;
    let published_at = field(ArticleField::PublishedAt)?;
    let source = field(ArticleField::Source)?;
    let title = field(ArticleField::Title)?;
    let url_to_image = field(ArticleField::UrlToImage)?;
    let url = field(ArticleField::Url)?.ok_or(ExtractFieldError::NullUrl { index })?;

    Ok(NewNews {
        author,
        content,
        description,
        published_at,
        source,
        title,
        url,
        url_to_image,
    })
}
