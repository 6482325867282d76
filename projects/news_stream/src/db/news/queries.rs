use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use thiserror::Error;
use crate::db::{news::models::*, schema::news};

#[derive(Debug, Error)]
pub enum InsertNewsError {
    #[error("DuplicateUrl: {url}")]
    DuplicateUrl {
        url: String,
    },

    #[error("InsertNews: {source}")]
    InsertNews {
        source: diesel::result::Error,
    },
}

/// Inserts one row in its own transaction. An existing `url` is reported as
/// [`InsertNewsError::DuplicateUrl`] and the stored row is left untouched.
pub fn insert_news(
    conn: &mut SqliteConnection,
    new: &NewNews,
) -> Result<usize, InsertNewsError> {
    conn.transaction(|conn| {
        diesel::insert_into(news::table)
            .values(new)
            .execute(conn)
    })
    .map_err(|source| match source {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            InsertNewsError::DuplicateUrl { url: new.url.clone() }
        }
        source => InsertNewsError::InsertNews { source },
    })
}

#[derive(Debug, Error)]
pub enum GetNewsByUrlError {
    #[error("GetNewsByUrl: {source}")]
    GetNewsByUrl {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn get_news_by_url(
    conn: &mut SqliteConnection,
    url_val: &str,
) -> Result<Option<News>, GetNewsByUrlError> {
    news::table
        .filter(news::url.eq(url_val))
        .select(News::as_select())
        .first(conn)
        .optional()
        .map_err(|source| GetNewsByUrlError::GetNewsByUrl { source })
}

#[derive(Debug, Error)]
pub enum CountNewsError {
    #[error("CountNews: {source}")]
    CountNews {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn count_news(conn: &mut SqliteConnection) -> Result<i64, CountNewsError> {
    news::table
        .count()
        .get_result(conn)
        .map_err(|source| CountNewsError::CountNews { source })
}
