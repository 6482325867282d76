pub mod error;
pub mod persist;
pub mod source;

pub use error::{ErrorKind, IngestError};
pub use persist::{fetch_and_store, insert_all, BatchReport, DuplicatePolicy};
pub use source::{ArticleSource, NewsApiSource};
