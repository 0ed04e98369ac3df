//! Wire types for the LLM configuration API and provider calls.

use serde::{Deserialize, Serialize};

/// LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    OpenAI,
    Anthropic,
    Groq,
}

impl LLMProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "anthropic" => Some(Self::Anthropic),
            "groq" => Some(Self::Groq),
            _ => None,
        }
    }

    /// Base URL of the provider's public API.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Groq => write!(f, "groq"),
        }
    }
}

/// One message sent to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// The provider, model and credentials a call will use.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    pub provider: LLMProvider,
    pub model: String,
    pub api_key: String,
    /// Root of the API, without a trailing slash.
    pub base_url: String,
}

/// Chat status response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStatus {
    pub llm_available: bool,
    pub llm_provider: Option<String>,
    pub default_model: Option<String>,
    pub available_models: Vec<String>,
}

/// LLM config response (keys masked).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LLMConfigResponse {
    pub preferred_provider: String,
    pub openai_configured: bool,
    pub anthropic_configured: bool,
    pub groq_configured: bool,
    pub openai_model: String,
    pub anthropic_model: String,
    pub groq_model: String,
    pub base_url: Option<String>,
    pub active_provider: Option<String>,
}

/// LLM config update request. An empty key string clears that key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LLMConfigUpdate {
    pub preferred_provider: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub anthropic_model: Option<String>,
    pub groq_model: Option<String>,
    pub base_url: Option<String>,
}

/// API key test request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestKeyRequest {
    pub provider: String,
    pub api_key: String,
}
