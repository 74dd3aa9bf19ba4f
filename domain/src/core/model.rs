//! Model value object representing the oracle's text-generation model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Text-generation models known to the default local backend (Value Object)
///
/// Anything else is carried verbatim as [`Model::Custom`], so any model
/// name the backend accepts can be configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Mistral,
    Llama31,
    Llama32,
    Gemma2,
    Qwen25,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier sent in the `model` field of a request
    pub fn as_str(&self) -> &str {
        match self {
            Model::Mistral => "mistral",
            Model::Llama31 => "llama3.1:latest",
            Model::Llama32 => "llama3.2:latest",
            Model::Gemma2 => "gemma2:latest",
            Model::Qwen25 => "qwen2.5:latest",
            Model::Custom(s) => s,
        }
    }
}

impl Default for Model {
    /// Returns the default model (mistral)
    fn default() -> Self {
        Model::Mistral
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "mistral" | "mistral:latest" => Model::Mistral,
            "llama3.1" | "llama3.1:latest" => Model::Llama31,
            "llama3.2" | "llama3.2:latest" => Model::Llama32,
            "gemma2" | "gemma2:latest" => Model::Gemma2,
            "qwen2.5" | "qwen2.5:latest" => Model::Qwen25,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
