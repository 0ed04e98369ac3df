//! Shared application state.

use std::path::Path;
use std::sync::Arc;

use foodsight_chat::{FallbackClient, LLMConfig};
use foodsight_core::{FoodSightConfig, Result};
use foodsight_data::FixtureDataset;
use foodsight_insights::InsightEngine;
use foodsight_store::{open_repository, ConversationRepository, MemoryRepository};
use parking_lot::RwLock;
use tracing::info;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: FoodSightConfig,
    pub dataset: Arc<FixtureDataset>,
    pub engine: InsightEngine,
    pub repo: Arc<dyn ConversationRepository>,
    /// Same handle the engine's fallback reads, so config edits apply live.
    pub llm_config: Arc<RwLock<LLMConfig>>,
    pub http: reqwest::Client,
}

impl AppState {
    /// Build state from configuration: standard dataset, the configured
    /// repository backend, and the LLM config file (with env key fallbacks).
    pub fn new(config: FoodSightConfig) -> Result<Self> {
        let repo = open_repository(config.store, &config.data_paths)?;
        let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
        info!(
            store = repo.backend(),
            llm_configured = llm_config.is_configured(),
            "Application state ready"
        );
        Ok(Self::from_parts(
            config,
            Arc::new(FixtureDataset::standard()),
            repo,
            llm_config,
        ))
    }

    /// In-memory repository, no LLM keys, and the standard dataset. Nothing
    /// is read from the environment.
    pub fn ephemeral(data_dir: impl AsRef<Path>) -> Result<Self> {
        let config = FoodSightConfig::from_lookup(data_dir, |_| None)?;
        let llm_config = LLMConfig::load_with(&config.data_paths.llm_config_file, |_| None);
        Ok(Self::from_parts(
            config,
            Arc::new(FixtureDataset::standard()),
            Arc::new(MemoryRepository::new()),
            llm_config,
        ))
    }

    pub fn from_parts(
        config: FoodSightConfig,
        dataset: Arc<FixtureDataset>,
        repo: Arc<dyn ConversationRepository>,
        llm_config: LLMConfig,
    ) -> Self {
        let llm_config = Arc::new(RwLock::new(llm_config));
        let fallback = FallbackClient::new(llm_config.clone(), config.llm_timeout);
        let http = fallback.http().clone();
        let engine = InsightEngine::new(dataset.clone(), fallback, config.min_confidence);
        Self {
            config,
            dataset,
            engine,
            repo,
            llm_config,
            http,
        }
    }
}
