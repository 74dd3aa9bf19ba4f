//! HTTP embedder speaking the OpenAI-compatible embeddings protocol.
//!
//! `POST {base_url}/v1/embeddings` with `{"model", "input": [..]}`; the reply
//! carries one `data[i].embedding` per input. Ollama, llama.cpp and hosted
//! OpenAI-compatible services all serve this endpoint, so the same server
//! that answers chat prompts can usually embed the questions too.

use async_trait::async_trait;
use insight_application::{EmbeddingError, TextEmbedder};
use insight_domain::{Embedding, truncate};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Connection settings for [`HttpEmbedder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingSettings {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub api_key: Option<String>,
}

impl EmbeddingSettings {
    pub const DEFAULT_MODEL: &'static str = "nomic-embed-text";
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            api_key: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: Option<usize>,
}

/// Embedder backed by a remote embedding model.
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    timeout: Duration,
    api_key: Option<String>,
}

impl HttpEmbedder {
    pub fn new(settings: EmbeddingSettings) -> Result<Self, EmbeddingError> {
        let base_url = settings.base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(EmbeddingError::Configuration(format!(
                "base URL must start with http:// or https://, got '{}'",
                settings.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| EmbeddingError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/embeddings", base_url),
            model: settings.model,
            timeout: settings.timeout,
            api_key: settings.api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, e: reqwest::Error) -> EmbeddingError {
        if e.is_timeout() {
            EmbeddingError::Timeout(self.timeout)
        } else {
            EmbeddingError::Connection(e.to_string())
        }
    }
}

/// Order the vectors by `index` and check there is exactly one per input.
fn collect_vectors(body: &str, expected: usize) -> Result<Vec<Embedding>, EmbeddingError> {
    let response: EmbeddingResponse = serde_json::from_str(body).map_err(|e| {
        EmbeddingError::Protocol(format!(
            "invalid response body ({}): {}",
            e,
            truncate(body, 200)
        ))
    })?;

    if response.data.len() != expected {
        return Err(EmbeddingError::Protocol(format!(
            "expected {} embeddings, got {}",
            expected,
            response.data.len()
        )));
    }

    let mut data = response.data;
    if data.iter().all(|d| d.index.is_some()) {
        data.sort_by_key(|d| d.index);
    }

    let vectors: Vec<Embedding> = data.into_iter().map(|d| Embedding::new(d.embedding)).collect();
    if let Some(first) = vectors.first()
        && first.dimensions() == 0
    {
        return Err(EmbeddingError::Protocol("empty embedding vector".to_string()));
    }
    Ok(vectors)
}

#[async_trait]
impl TextEmbedder for HttpEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Embedding request to {} failed: {}", self.endpoint, e);
            self.transport_error(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Embedding backend returned HTTP {}: {}", status, truncate(&body, 200));
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let vectors = collect_vectors(&body, texts.len())?;

        debug!(
            "Embedded {} texts with {} in {} ms",
            vectors.len(),
            self.model,
            start.elapsed().as_millis()
        );
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{MockServer, Route};
    use insight_application::Retryable;
    use serde_json::json;

    fn settings(base_url: String) -> EmbeddingSettings {
        EmbeddingSettings {
            base_url,
            timeout: Duration::from_secs(5),
            ..EmbeddingSettings::default()
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let embedder = HttpEmbedder::new(settings("http://localhost:11434/".to_string())).unwrap();
        assert_eq!(embedder.endpoint(), "http://localhost:11434/v1/embeddings");
        assert_eq!(embedder.name(), "nomic-embed-text");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = HttpEmbedder::new(settings("localhost:11434".to_string()))
            .err()
            .unwrap();
        assert!(matches!(err, EmbeddingError::Configuration(_)));
    }

    #[test]
    fn test_vectors_follow_index_order() {
        let body = json!({
            "data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]
        })
        .to_string();

        let vectors = collect_vectors(&body, 2).unwrap();

        assert_eq!(vectors[0], Embedding::new(vec![1.0, 0.0]));
        assert_eq!(vectors[1], Embedding::new(vec![0.0, 1.0]));
    }

    #[test]
    fn test_wrong_vector_count_is_protocol_error() {
        let body = json!({"data": [{"embedding": [1.0]}]}).to_string();
        let err = collect_vectors(&body, 2).unwrap_err();
        assert!(matches!(err, EmbeddingError::Protocol(_)));
        assert!(!err.is_retryable());

        let err = collect_vectors("<html>Bad Gateway</html>", 1).unwrap_err();
        assert!(matches!(err, EmbeddingError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_embed_round_trip() {
        let server = MockServer::start(vec![Route::json(
            "/v1/embeddings",
            json!({
                "object": "list",
                "data": [
                    {"object": "embedding", "index": 0, "embedding": [0.6, 0.8]},
                    {"object": "embedding", "index": 1, "embedding": [1.0, 0.0]}
                ]
            }),
        )])
        .await;
        let embedder = HttpEmbedder::new(EmbeddingSettings {
            api_key: Some("secret-token".to_string()),
            ..settings(server.base_url())
        })
        .unwrap();

        let vectors = embedder.embed(&["first", "second"]).await.unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], Embedding::new(vec![0.6, 0.8]));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].head.starts_with("POST /v1/embeddings HTTP/1.1"));
        assert!(
            requests[0]
                .head
                .to_lowercase()
                .contains("authorization: bearer secret-token")
        );
        assert_eq!(
            requests[0].json(),
            json!({"model": "nomic-embed-text", "input": ["first", "second"]})
        );
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_request() {
        let server = MockServer::start(vec![]).await;
        let embedder = HttpEmbedder::new(settings(server.base_url())).unwrap();

        assert!(embedder.embed(&[]).await.unwrap().is_empty());
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_model_is_not_retryable() {
        let server = MockServer::start(vec![Route::status(
            "/v1/embeddings",
            "404 Not Found",
            r#"{"error":"model \"nomic-embed-text\" not found"}"#,
        )])
        .await;
        let embedder = HttpEmbedder::new(settings(server.base_url())).unwrap();

        let err = embedder.embed(&["q"]).await.unwrap_err();

        assert!(matches!(err, EmbeddingError::Status { status: 404, .. }));
        assert!(!err.is_retryable());
    }
}
