//! HTTP chat oracle

use super::protocol::{ChatCompletionRequest, extract_reply_content};
use async_trait::async_trait;
use insight_application::{ChatOracle, OracleError};
use insight_domain::{Model, truncate};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Connection settings for [`HttpChatOracle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleSettings {
    pub base_url: String,
    pub model: Model,
    pub timeout: Duration,
    pub api_key: Option<String>,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: Model::default(),
            timeout: Duration::from_secs(60),
            api_key: None,
        }
    }
}

/// Chat oracle speaking the OpenAI-compatible chat completions protocol.
///
/// Holds one pooled `reqwest::Client`; share the oracle through `Arc` rather
/// than building one per request.
pub struct HttpChatOracle {
    client: reqwest::Client,
    endpoint: String,
    model: Model,
    timeout: Duration,
    api_key: Option<String>,
}

impl HttpChatOracle {
    pub fn new(settings: OracleSettings) -> Result<Self, OracleError> {
        let base_url = settings.base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(OracleError::Configuration(format!(
                "base URL must start with http:// or https://, got '{}'",
                settings.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| OracleError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/chat/completions", base_url),
            model: settings.model,
            timeout: settings.timeout,
            api_key: settings.api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    fn transport_error(&self, e: reqwest::Error) -> OracleError {
        if e.is_timeout() {
            OracleError::Timeout(self.timeout)
        } else {
            OracleError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl ChatOracle for HttpChatOracle {
    async fn send(&self, prompt: &str) -> Result<String, OracleError> {
        let start = Instant::now();
        let request = ChatCompletionRequest::user_prompt(self.model.as_str(), prompt);

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Oracle request to {} failed: {}", self.endpoint, e);
            self.transport_error(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Oracle returned HTTP {}: {}", status, truncate(&body, 200));
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let content = extract_reply_content(&body)?;

        debug!(
            "Oracle reply from {} in {} ms ({} chars)",
            self.model,
            start.elapsed().as_millis(),
            content.len()
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{MockServer, Route};
    use insight_application::Retryable;
    use serde_json::json;
    use tokio::net::TcpListener;

    fn settings(base_url: String) -> OracleSettings {
        OracleSettings {
            base_url,
            timeout: Duration::from_secs(5),
            ..OracleSettings::default()
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = OracleSettings::default();
        assert_eq!(settings.base_url, "http://localhost:11434");
        assert_eq!(settings.model, Model::Mistral);
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let oracle = HttpChatOracle::new(settings("http://localhost:11434/".to_string())).unwrap();
        assert_eq!(oracle.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = HttpChatOracle::new(settings("localhost:11434".to_string()))
            .err()
            .unwrap();
        assert!(matches!(err, OracleError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_send_round_trip() {
        let server = MockServer::start(vec![Route::json(
            "/v1/chat/completions",
            json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"category\": \"Billing\"}"}}]
            }),
        )])
        .await;

        let oracle = HttpChatOracle::new(OracleSettings {
            api_key: Some("secret-token".to_string()),
            ..settings(server.base_url())
        })
        .unwrap();

        let reply = oracle.send("What is the category?").await.unwrap();
        assert_eq!(reply, "{\"category\": \"Billing\"}");

        let request = &server.requests()[0];
        assert!(request.head.starts_with("POST /v1/chat/completions HTTP/1.1"));
        assert!(
            request
                .head
                .to_lowercase()
                .contains("authorization: bearer secret-token")
        );
        let sent = request.json();
        assert_eq!(sent["model"], "mistral");
        assert_eq!(sent["messages"][0]["role"], "user");
        assert_eq!(sent["messages"][0]["content"], "What is the category?");
    }

    #[tokio::test]
    async fn test_server_error_is_retryable_status() {
        let server = MockServer::start(vec![Route::status(
            "/v1/chat/completions",
            "503 Service Unavailable",
            "busy",
        )])
        .await;
        let oracle = HttpChatOracle::new(settings(server.base_url())).unwrap();

        let err = oracle.send("hi").await.unwrap_err();

        assert!(matches!(err, OracleError::Status { status: 503, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_client_error_is_not_retryable() {
        let server = MockServer::start(vec![Route::status(
            "/v1/chat/completions",
            "404 Not Found",
            r#"{"error":"model not found"}"#,
        )])
        .await;
        let oracle = HttpChatOracle::new(settings(server.base_url())).unwrap();

        let err = oracle.send("hi").await.unwrap_err();

        match &err {
            OracleError::Status { status, body } => {
                assert_eq!(*status, 404);
                assert!(body.contains("model not found"));
            }
            other => panic!("expected Status, got {:?}", other),
        }
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_missing_content_is_protocol_error() {
        let server = MockServer::start(vec![Route::json(
            "/v1/chat/completions",
            json!({"choices": []}),
        )])
        .await;
        let oracle = HttpChatOracle::new(settings(server.base_url())).unwrap();

        let err = oracle.send("hi").await.unwrap_err();

        assert!(matches!(err, OracleError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_retryable() {
        // Bind then drop to get a port with nothing listening.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let oracle = HttpChatOracle::new(settings(format!("http://{}", addr))).unwrap();

        let err = oracle.send("hi").await.unwrap_err();

        assert!(matches!(err, OracleError::Connection(_)));
        assert!(err.is_retryable());
    }
}
