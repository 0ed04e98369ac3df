//! LLM configuration persistence and provider selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use foodsight_core::Result;

use crate::types::{LLMConfigResponse, LLMConfigUpdate, LLMProvider, ResolvedModel};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

pub const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo"];
pub const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-5-haiku-20241022",
    "claude-3-5-sonnet-20241022",
];
pub const GROQ_MODELS: &[&str] = &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"];

/// Stored LLM configuration (persisted to llm-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    /// Override for OpenAI-compatible gateways and local test servers.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            groq_model: default_groq_model(),
            base_url: None,
            config_path: PathBuf::new(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`LLMConfig::load`] with an explicit lookup for the key fallbacks.
    pub fn load_with<F>(config_path: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: LLMConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();

        if non_empty(config.openai_api_key.clone()).is_none() {
            config.openai_api_key = non_empty(lookup("OPENAI_API_KEY"));
        }
        if non_empty(config.anthropic_api_key.clone()).is_none() {
            config.anthropic_api_key = non_empty(lookup("ANTHROPIC_API_KEY"));
        }
        if non_empty(config.groq_api_key.clone()).is_none() {
            config.groq_api_key = non_empty(lookup("GROQ_API_KEY"));
        }
        if config.base_url.is_none() {
            config.base_url = non_empty(lookup("FOODSIGHT_LLM_BASE_URL"));
        }

        config
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved LLM config to {}", self.config_path.display());
        Ok(())
    }

    /// Apply an update, merging with existing config.
    pub fn apply_update(&mut self, update: &LLMConfigUpdate) {
        if let Some(p) = &update.preferred_provider {
            self.preferred_provider = p.trim().to_ascii_lowercase();
        }
        if let Some(k) = &update.openai_api_key {
            self.openai_api_key = non_empty(Some(k.clone()));
        }
        if let Some(k) = &update.anthropic_api_key {
            self.anthropic_api_key = non_empty(Some(k.clone()));
        }
        if let Some(k) = &update.groq_api_key {
            self.groq_api_key = non_empty(Some(k.clone()));
        }
        if let Some(m) = &update.openai_model {
            self.openai_model = m.clone();
        }
        if let Some(m) = &update.anthropic_model {
            self.anthropic_model = m.clone();
        }
        if let Some(m) = &update.groq_model {
            self.groq_model = m.clone();
        }
        if let Some(u) = &update.base_url {
            self.base_url = non_empty(Some(u.trim_end_matches('/').to_string()));
        }
    }

    fn model_for(&self, provider: LLMProvider) -> Option<ResolvedModel> {
        let (key, model) = match provider {
            LLMProvider::OpenAI => (&self.openai_api_key, &self.openai_model),
            LLMProvider::Anthropic => (&self.anthropic_api_key, &self.anthropic_model),
            LLMProvider::Groq => (&self.groq_api_key, &self.groq_model),
        };
        let api_key = non_empty(key.clone())?;
        let base_url = self
            .base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string());
        Some(ResolvedModel {
            provider,
            model: model.clone(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve which provider and model to use.
    pub fn resolve_provider(&self) -> Option<ResolvedModel> {
        if self.preferred_provider != "auto" {
            return LLMProvider::parse(&self.preferred_provider).and_then(|p| self.model_for(p));
        }

        // Auto mode: Anthropic > Groq > OpenAI
        [LLMProvider::Anthropic, LLMProvider::Groq, LLMProvider::OpenAI]
            .into_iter()
            .find_map(|p| self.model_for(p))
    }

    pub fn is_configured(&self) -> bool {
        self.resolve_provider().is_some()
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> LLMConfigResponse {
        LLMConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            openai_configured: non_empty(self.openai_api_key.clone()).is_some(),
            anthropic_configured: non_empty(self.anthropic_api_key.clone()).is_some(),
            groq_configured: non_empty(self.groq_api_key.clone()).is_some(),
            openai_model: self.openai_model.clone(),
            anthropic_model: self.anthropic_model.clone(),
            groq_model: self.groq_model.clone(),
            base_url: self.base_url.clone(),
            active_provider: self.resolve_provider().map(|r| r.provider.to_string()),
        }
    }

    /// Get available models for the active provider.
    pub fn available_models(&self) -> Vec<String> {
        let models = match self.resolve_provider().map(|r| r.provider) {
            Some(LLMProvider::OpenAI) => OPENAI_MODELS,
            Some(LLMProvider::Anthropic) => ANTHROPIC_MODELS,
            Some(LLMProvider::Groq) => GROQ_MODELS,
            None => &[],
        };
        models.iter().map(|s| s.to_string()).collect()
    }
}
