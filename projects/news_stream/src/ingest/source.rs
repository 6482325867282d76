use std::time::Duration;

use interfaces_newsapi_everything::index::{fetch_everything, FetchEverythingError};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::info;

use crate::config::Config;

/// Where article records come from.
#[allow(async_fn_in_trait)]
pub trait ArticleSource {
    async fn search(&self, topic: &str) -> Result<Vec<Value>, FetchEverythingError>;
}

/// NewsAPI `everything` search pinned to one publisher.
pub struct NewsApiSource {
    client: Client,
    base_url: String,
    api_key: String,
    source: String,
}

impl NewsApiSource {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        source: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            source: source.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.api_base_url.clone(),
            config.api_key.clone(),
            config.source.clone(),
            config.http_timeout,
        )
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl ArticleSource for NewsApiSource {
    async fn search(&self, topic: &str) -> Result<Vec<Value>, FetchEverythingError> {
        let mut params = Map::new();
        params.insert("sources".to_owned(), Value::String(self.source.clone()));
        params.insert("q".to_owned(), Value::String(topic.to_owned()));

        info!(topic, source = %self.source, "fetching articles");

        let articles = fetch_everything(&self.client, &self.base_url, &self.api_key, &params).await?;

        info!(count = articles.len(), "fetched articles");
        Ok(articles)
    }
}
