use interfaces_newsapi_everything::index::FetchEverythingError;
use thiserror::Error;

use crate::db::news::queries::InsertNewsError;
use crate::utils::field_extraction::ExtractFieldError;

/// What went wrong, at the granularity the form reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// NewsAPI rejected the request.
    Api,
    /// Input or an article had an unusable shape.
    Type,
    /// An article URL is already stored, or an article has no URL at all.
    Duplicate,
    /// Anything the form cannot recover from.
    Fatal,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("FetchEverything: {source}")]
    FetchEverything {
        #[from]
        source: FetchEverythingError,
    },

    #[error("ExtractField: {source}")]
    ExtractField {
        #[from]
        source: ExtractFieldError,
    },

    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },

    #[error("InsertNews: {source}")]
    InsertNews {
        #[from]
        source: InsertNewsError,
    },
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::FetchEverything { source } => match source {
                FetchEverythingError::Api { .. } => ErrorKind::Api,
                FetchEverythingError::InvalidParameterType { .. } => ErrorKind::Type,
                FetchEverythingError::RequestSend { .. }
                | FetchEverythingError::ResponseRead { .. }
                | FetchEverythingError::DeserializeResponseBody { .. } => ErrorKind::Fatal,
            },
            IngestError::ExtractField { source } => match source {
                ExtractFieldError::TypeMismatch { .. } => ErrorKind::Type,
                ExtractFieldError::NullUrl { .. } => ErrorKind::Duplicate,
                ExtractFieldError::IndexOutOfRange { .. }
                | ExtractFieldError::RecordNotObject { .. }
                | ExtractFieldError::MissingKey { .. } => ErrorKind::Fatal,
            },
            IngestError::GetConnectionFromPool { .. } => ErrorKind::Fatal,
            IngestError::InsertNews { source } => match source {
                InsertNewsError::DuplicateUrl { .. } => ErrorKind::Duplicate,
                InsertNewsError::InsertNews { .. } => ErrorKind::Fatal,
            },
        }
    }
}
