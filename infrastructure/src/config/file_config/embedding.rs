//! Embedding configuration from TOML (`[embedding]` section)

use crate::embedding::{EmbedderSettings, EmbeddingBackend, EmbeddingSettings, HashingEmbedder};
use crate::oracle::OracleSettings;
use insight_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw embedding configuration from TOML
///
/// ```toml
/// [embedding]
/// backend = "http"                 # "http" (or "openai-compatible", "ollama"), "hashing"
/// model = "nomic-embed-text"       # http only
/// base_url = "http://embed:11434"  # http only; defaults to oracle.base_url
/// dimensions = 256                 # hashing only
/// remove_stop_words = true         # hashing only
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEmbeddingConfig {
    pub backend: String,
    pub model: String,
    pub base_url: Option<String>,
    pub dimensions: usize,
    pub remove_stop_words: bool,
}

impl Default for FileEmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default().to_string(),
            model: EmbeddingSettings::DEFAULT_MODEL.to_string(),
            base_url: None,
            dimensions: HashingEmbedder::DEFAULT_DIMENSIONS,
            remove_stop_words: true,
        }
    }
}

impl FileEmbeddingConfig {
    pub fn parse_backend(&self) -> (EmbeddingBackend, Vec<ConfigIssue>) {
        match self.backend.parse::<EmbeddingBackend>() {
            Ok(backend) => (backend, vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::UnknownEmbeddingBackend,
                    format!(
                        "embedding.backend: unknown value '{}' (valid: {})",
                        self.backend,
                        EmbeddingBackend::VALID_NAMES.join(", ")
                    ),
                );
                (EmbeddingBackend::default(), vec![issue])
            }
        }
    }

    pub fn to_hashing_embedder(&self) -> (HashingEmbedder, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let dimensions = if self.dimensions == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroDimensions,
                "embedding.dimensions cannot be 0",
            ));
            HashingEmbedder::DEFAULT_DIMENSIONS
        } else {
            self.dimensions
        };

        let embedder =
            HashingEmbedder::new(dimensions).with_stop_words(self.remove_stop_words);
        (embedder, issues)
    }

    /// HTTP embedder settings. The server, timeout and API key default to
    /// the oracle's.
    pub fn to_http_settings(&self, oracle: &OracleSettings) -> (EmbeddingSettings, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let model = self.model.trim();
        let model = if model.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModel,
                "embedding.model: model name cannot be empty",
            ));
            EmbeddingSettings::DEFAULT_MODEL.to_string()
        } else {
            model.to_string()
        };

        let base_url = match &self.base_url {
            Some(url) => {
                let url = url.trim().to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::InvalidBaseUrl,
                        format!("embedding.base_url: '{}' is not an http:// or https:// URL", url),
                    ));
                }
                url
            }
            None => oracle.base_url.clone(),
        };

        let settings = EmbeddingSettings {
            base_url,
            model,
            timeout: oracle.timeout,
            api_key: oracle.api_key.clone(),
        };
        (settings, issues)
    }

    /// Resolve the configured backend. Only the selected backend's fields are
    /// checked.
    pub fn to_settings(&self, oracle: &OracleSettings) -> (EmbedderSettings, Vec<ConfigIssue>) {
        let (backend, mut issues) = self.parse_backend();
        let settings = match backend {
            EmbeddingBackend::Http => {
                let (settings, http_issues) = self.to_http_settings(oracle);
                issues.extend(http_issues);
                EmbedderSettings::Http(settings)
            }
            EmbeddingBackend::Hashing => {
                let (embedder, hashing_issues) = self.to_hashing_embedder();
                issues.extend(hashing_issues);
                EmbedderSettings::Hashing(embedder)
            }
        };
        (settings, issues)
    }
}
