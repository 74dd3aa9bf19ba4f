//! Chat oracle adapters.
//!
//! The only wire protocol spoken is the OpenAI-compatible
//! `POST {base_url}/v1/chat/completions` exchange, which local servers such
//! as Ollama also implement.

mod client;
mod protocol;

pub use client::{HttpChatOracle, OracleSettings};
pub use protocol::{ChatCompletionRequest, ChatMessage, extract_reply_content};

use std::fmt;

/// Oracle backend selected by `[oracle] backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleBackend {
    /// OpenAI-compatible chat completions over HTTP
    #[default]
    OpenAiCompatible,
}

impl OracleBackend {
    pub const VALID_NAMES: [&'static str; 3] = ["openai-compatible", "openai", "ollama"];
}

impl fmt::Display for OracleBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleBackend::OpenAiCompatible => write!(f, "openai-compatible"),
        }
    }
}

impl std::str::FromStr for OracleBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai-compatible" | "openai" | "ollama" => Ok(OracleBackend::OpenAiCompatible),
            _ => Err(format!("Invalid OracleBackend: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_aliases() {
        for name in OracleBackend::VALID_NAMES {
            assert_eq!(name.parse(), Ok(OracleBackend::OpenAiCompatible));
        }
        assert_eq!("Ollama".parse(), Ok(OracleBackend::OpenAiCompatible));
        assert!("bedrock".parse::<OracleBackend>().is_err());
    }
}
