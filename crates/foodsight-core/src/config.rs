//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_PORT: u16 = 3004;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Paths to all FoodSight data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// SQLite conversation store directory (`data/conversations/`).
    pub conversations_db: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            conversations_db: root.join("conversations"),
            llm_config_file: root.join("llm-config.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(&self.conversations_db)?;
        Ok(())
    }
}

/// Which conversation repository backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" | "in-memory" => Some(Self::Memory),
            "sqlite" | "db" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Top-level FoodSight configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSightConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Conversation store backend.
    pub store: StoreBackend,
    /// Upper bound on a single fallback LLM call.
    pub llm_timeout: Duration,
    /// Classifications below this confidence are treated as unmatched.
    pub min_confidence: f64,
}

impl FoodSightConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unparseable values
    /// fall back to their defaults.
    pub fn from_lookup<F>(data_dir: impl AsRef<Path>, lookup: F) -> std::io::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let store = match lookup("FOODSIGHT_STORE") {
            Some(value) => StoreBackend::parse(&value).unwrap_or_else(|| {
                warn!("Unknown FOODSIGHT_STORE '{}', using memory", value);
                StoreBackend::Memory
            }),
            None => StoreBackend::Memory,
        };

        let llm_timeout = lookup("FOODSIGHT_LLM_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS));

        let min_confidence = lookup("FOODSIGHT_MIN_CONFIDENCE")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|c| c.is_finite() && (0.0..=1.0).contains(c))
            .unwrap_or(DEFAULT_MIN_CONFIDENCE);

        let data_paths = DataPaths::new(data_dir)?;
        debug!(port, %store, ?llm_timeout, min_confidence, "Configuration loaded");

        Ok(Self {
            port,
            data_paths,
            store,
            llm_timeout,
            min_confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FoodSightConfig::from_lookup(dir.path(), lookup_from(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.llm_timeout, Duration::from_secs(30));
        assert_eq!(config.min_confidence, DEFAULT_MIN_CONFIDENCE);
        assert!(config.data_paths.conversations_db.exists());
    }

    #[test]
    fn test_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = FoodSightConfig::from_lookup(
            dir.path(),
            lookup_from(&[
                ("PORT", "8080"),
                ("FOODSIGHT_STORE", "SQLite"),
                ("FOODSIGHT_LLM_TIMEOUT_SECS", "5"),
                ("FOODSIGHT_MIN_CONFIDENCE", "0.8"),
            ]),
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert_eq!(config.llm_timeout, Duration::from_secs(5));
        assert_eq!(config.min_confidence, 0.8);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = FoodSightConfig::from_lookup(
            dir.path(),
            lookup_from(&[
                ("PORT", "not-a-port"),
                ("FOODSIGHT_STORE", "postgres"),
                ("FOODSIGHT_LLM_TIMEOUT_SECS", "0"),
                ("FOODSIGHT_MIN_CONFIDENCE", "1.5"),
            ]),
        )
        .unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.llm_timeout, Duration::from_secs(30));
        assert_eq!(config.min_confidence, DEFAULT_MIN_CONFIDENCE);
    }
}
