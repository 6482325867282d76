use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

const EVERYTHING_PATH: &str = "/v2/everything";

/// Body returned by `/v2/everything`. Articles are kept as raw JSON records.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    total_results: Option<u64>,
    #[serde(default)]
    articles: Vec<Value>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Searches every article NewsAPI indexes.
///
/// `params` are passed through as query parameters (`q`, `sources`, ...). Every
/// value must be a JSON string; anything else is rejected before a request is made.
pub async fn fetch_everything(
    client: &Client,
    base_url: &str,
    api_key: &str,
    params: &Map<String, Value>,
) -> Result<Vec<Value>, FetchEverythingError> {
    let query = query_pairs(params)?;
    let endpoint = format!("{}{EVERYTHING_PATH}", base_url.trim_end_matches('/'));

    debug!(%endpoint, ?query, "requesting everything search");

    let response = client
        .get(&endpoint)
        .header("X-Api-Key", api_key)
        .header("User-Agent", "news-stream")
        .query(&query)
        .send()
        .await
        .map_err(|source| FetchEverythingError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchEverythingError::ResponseRead { source })?;

    if !status.is_success() {
        return Err(api_error(status, &body));
    }

    let parsed: EverythingResponse = serde_json::from_str(&body)
        .map_err(|source| FetchEverythingError::DeserializeResponseBody { source })?;

    if parsed.status != "ok" {
        return Err(FetchEverythingError::Api {
            status,
            code: parsed.code,
            message: parsed.message.unwrap_or_default(),
        });
    }

    debug!(
        total_results = parsed.total_results.unwrap_or_default(),
        returned = parsed.articles.len(),
        "everything search answered"
    );

    Ok(parsed.articles)
}

fn query_pairs(params: &Map<String, Value>) -> Result<Vec<(&str, &str)>, FetchEverythingError> {
    params
        .iter()
        .map(|(name, value)| match value {
            Value::String(text) => Ok((name.as_str(), text.as_str())),
            other => Err(FetchEverythingError::InvalidParameterType {
                name: name.clone(),
                found: json_type_name(other),
            }),
        })
        .collect()
}

fn api_error(status: StatusCode, body: &str) -> FetchEverythingError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { code, message }) => FetchEverythingError::Api {
            status,
            code,
            message: message.unwrap_or_default(),
        },
        Err(_) => FetchEverythingError::Api {
            status,
            code: None,
            message: body.to_owned(),
        },
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Error)]
pub enum FetchEverythingError {
    #[error("InvalidParameterType: `{name}` must be a string, got {found}")]
    InvalidParameterType {
        name: String,
        found: &'static str,
    },

    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },

    #[error("Api: {status} {code:?}: {message}")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    use super::*;

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn params(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    async fn echo_search(
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("secret") {
            return (
                AxumStatus::UNAUTHORIZED,
                Json(json!({"status": "error", "code": "apiKeyInvalid", "message": "bad key"})),
            );
        }
        let Some(q) = query.get("q").filter(|q| !q.is_empty()) else {
            return (
                AxumStatus::BAD_REQUEST,
                Json(json!({
                    "status": "error",
                    "code": "parametersMissing",
                    "message": "Required parameters are missing."
                })),
            );
        };
        let source = query.get("sources").cloned().unwrap_or_default();
        (
            AxumStatus::OK,
            Json(json!({
                "status": "ok",
                "totalResults": 1,
                "articles": [{
                    "source": {"id": source, "name": "Bloomberg"},
                    "title": q,
                    "url": "http://example.com/a",
                    "publishedAt": "2023-05-01T12:00:00Z"
                }]
            })),
        )
    }

    #[tokio::test]
    async fn returns_articles_and_forwards_query_and_source() {
        let base = spawn_stub(Router::new().route("/v2/everything", get(echo_search))).await;

        let articles = fetch_everything(
            &Client::new(),
            &base,
            "secret",
            &params(&[("q", json!("markets")), ("sources", json!("bloomberg"))]),
        )
        .await
        .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0]["title"], "markets");
        assert_eq!(articles[0]["source"]["id"], "bloomberg");
    }

    #[tokio::test]
    async fn upstream_rejection_is_an_api_error() {
        let base = spawn_stub(Router::new().route("/v2/everything", get(echo_search))).await;

        let err = fetch_everything(
            &Client::new(),
            &base,
            "secret",
            &params(&[("q", json!("")), ("sources", json!("bloomberg"))]),
        )
        .await
        .unwrap_err();

        match err {
            FetchEverythingError::Api { status, code, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(code.as_deref(), Some("parametersMissing"));
                assert_eq!(message, "Required parameters are missing.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn wrong_key_is_an_api_error() {
        let base = spawn_stub(Router::new().route("/v2/everything", get(echo_search))).await;

        let err = fetch_everything(&Client::new(), &base, "nope", &params(&[("q", json!("x"))]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchEverythingError::Api { status, .. } if status == StatusCode::UNAUTHORIZED
        ));
    }

    #[tokio::test]
    async fn error_status_inside_ok_response_is_an_api_error() {
        let app = Router::new().route(
            "/v2/everything",
            get(|| async { Json(json!({"status": "error", "code": "rateLimited", "message": "slow down"})) }),
        );
        let base = spawn_stub(app).await;

        let err = fetch_everything(&Client::new(), &base, "secret", &params(&[("q", json!("x"))]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchEverythingError::Api { code: Some(ref code), .. } if code == "rateLimited"
        ));
    }

    #[tokio::test]
    async fn non_string_query_is_rejected_before_sending() {
        // Port 9 is discard; a request would fail with RequestSend instead.
        let err = fetch_everything(
            &Client::new(),
            "http://127.0.0.1:9",
            "secret",
            &params(&[("q", json!({"0": "markets"})), ("sources", json!("bloomberg"))]),
        )
        .await
        .unwrap_err();

        match err {
            FetchEverythingError::InvalidParameterType { name, found } => {
                assert_eq!(name, "q");
                assert_eq!(found, "object");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_article_list_is_not_an_error() {
        let app = Router::new().route(
            "/v2/everything",
            get(|| async { Json(json!({"status": "ok", "totalResults": 0, "articles": []})) }),
        );
        let base = spawn_stub(app).await;

        let articles = fetch_everything(&Client::new(), &base, "secret", &params(&[("q", json!("x"))]))
            .await
            .unwrap();

        assert!(articles.is_empty());
    }
}
