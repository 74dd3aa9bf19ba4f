//! Oracle configuration from TOML (`[oracle]` section)

use crate::oracle::{OracleBackend, OracleSettings};
use insight_domain::{ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw oracle configuration from TOML
///
/// # Example
///
/// ```toml
/// [oracle]
/// backend = "ollama"                  # "openai-compatible", "openai", "ollama"
/// base_url = "http://localhost:11434"
/// model = "mistral"
/// timeout_seconds = 60
/// api_key_env = "OPENAI_API_KEY"      # read the bearer token from this variable
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    pub backend: String,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        let settings = OracleSettings::default();
        Self {
            backend: OracleBackend::default().to_string(),
            base_url: settings.base_url,
            model: settings.model.to_string(),
            timeout_seconds: settings.timeout.as_secs(),
            api_key_env: None,
        }
    }
}

impl FileOracleConfig {
    /// Parse the backend name, reporting an error for unknown backends.
    pub fn parse_backend(&self) -> (OracleBackend, Vec<ConfigIssue>) {
        match self.backend.parse::<OracleBackend>() {
            Ok(backend) => (backend, vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::UnknownBackend,
                    format!(
                        "oracle.backend: unknown value '{}' (valid: {})",
                        self.backend,
                        OracleBackend::VALID_NAMES.join(", ")
                    ),
                );
                (OracleBackend::default(), vec![issue])
            }
        }
    }

    /// Parse the model name. An empty name falls back to the default model.
    pub fn parse_model(&self) -> (Model, Vec<ConfigIssue>) {
        let name = self.model.trim();
        if name.is_empty() {
            let issue = ConfigIssue::error(
                ConfigIssueCode::EmptyModel,
                "oracle.model: model name cannot be empty",
            );
            return (Model::default(), vec![issue]);
        }
        (Model::from(name), vec![])
    }

    /// Build connection settings, resolving the API key from the environment.
    pub fn to_settings(&self) -> (OracleSettings, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (model, model_issues) = self.parse_model();
        issues.extend(model_issues);

        let base_url = self.base_url.trim().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidBaseUrl,
                format!(
                    "oracle.base_url: '{}' is not an http:// or https:// URL",
                    self.base_url
                ),
            ));
        }

        let timeout = if self.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "oracle.timeout_seconds cannot be 0",
            ));
            OracleSettings::default().timeout
        } else {
            Duration::from_secs(self.timeout_seconds)
        };

        let api_key = self
            .api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.is_empty());

        let settings = OracleSettings {
            base_url,
            model,
            timeout,
            api_key,
        };
        (settings, issues)
    }
}
