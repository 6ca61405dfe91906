//! Configuration model for a try-on session.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section is
//! optional; missing fields fall back to the defaults below.

use crate::cache::CacheCapacity;
use crate::error::{FitifyError, Result};
use crate::pose::{DEFAULT_POSE_INSTRUCTIONS, PoseCatalog};
use serde::{Deserialize, Serialize};

/// Number of generation records kept in persisted history.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Default request timeout towards the generation engine, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TryOnConfig {
    pub engine: EngineSettings,
    pub wardrobe: WardrobeSettings,
    pub cache: CacheSettings,
    pub poses: PoseSettings,
    pub logging: LoggingSettings,
}

impl TryOnConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poses.instructions.is_empty() {
            return Err(FitifyError::config("at least one pose instruction is required"));
        }
        if self.poses.instructions.iter().any(|p| p.trim().is_empty()) {
            return Err(FitifyError::config("pose instructions must not be blank"));
        }
        if self.engine.request_timeout_secs == 0 {
            return Err(FitifyError::config("engine.request_timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn pose_catalog(&self) -> Result<PoseCatalog> {
        PoseCatalog::from_instructions(self.poses.instructions.iter().cloned())
            .ok_or_else(|| FitifyError::config("at least one pose instruction is required"))
    }

    pub fn cache_capacity(&self) -> CacheCapacity {
        CacheCapacity::from_limit(self.cache.capacity)
    }
}

/// Where the generation engine and ledger live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub base_url: String,
    /// Ledger account; balance queries need it.
    pub user_id: Option<u64>,
    pub request_timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            user_id: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WardrobeSettings {
    /// Prefix for the default wardrobe image locators.
    pub media_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum in-memory cache entries; unset means unbounded.
    pub capacity: Option<usize>,
    /// Maximum persisted history records.
    pub history_limit: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseSettings {
    pub instructions: Vec<String>,
}

impl Default for PoseSettings {
    fn default() -> Self {
        Self {
            instructions: DEFAULT_POSE_INSTRUCTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = TryOnConfig::from_toml_str("").unwrap();
        assert_eq!(config, TryOnConfig::default());
        assert_eq!(config.cache.history_limit, 100);
        assert_eq!(config.cache_capacity(), CacheCapacity::Unbounded);
        assert_eq!(config.pose_catalog().unwrap().len(), 6);
    }

    #[test]
    fn test_partial_document() {
        let config = TryOnConfig::from_toml_str(
            r#"
            [engine]
            base_url = "https://engine.example.com"
            user_id = 42

            [cache]
            capacity = 256

            [poses]
            instructions = ["Front", "Back"]
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.base_url, "https://engine.example.com");
        assert_eq!(config.engine.user_id, Some(42));
        assert_eq!(config.engine.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(matches!(config.cache_capacity(), CacheCapacity::Bounded(n) if n.get() == 256));
        assert_eq!(config.cache.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.pose_catalog().unwrap().default_pose().instruction(), "Front");
    }

    #[test]
    fn test_invalid_documents() {
        assert!(TryOnConfig::from_toml_str("[poses]\ninstructions = []").unwrap_err().is_config());
        assert!(
            TryOnConfig::from_toml_str("[engine]\nrequest_timeout_secs = 0")
                .unwrap_err()
                .is_config()
        );
        assert!(
            TryOnConfig::from_toml_str("engine = 3")
                .unwrap_err()
                .is_serialization()
        );
    }
}
