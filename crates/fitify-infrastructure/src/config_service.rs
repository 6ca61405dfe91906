//! Configuration service.
//!
//! Loads [`TryOnConfig`] from `config.toml` in the Fitify config directory,
//! then applies environment overrides.

use crate::paths::FitifyPaths;
use fitify_core::config::TryOnConfig;
use fitify_core::{FitifyError, Result};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

pub const ENV_ENGINE_URL: &str = "FITIFY_ENGINE_URL";
pub const ENV_MEDIA_URL: &str = "FITIFY_MEDIA_URL";
pub const ENV_USER_ID: &str = "FITIFY_USER_ID";

/// Loads and caches the configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: FitifyPaths,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<TryOnConfig>>>,
}

impl ConfigService {
    pub fn new(paths: FitifyPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    pub fn get_config(&self) -> Result<TryOnConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn load(&self) -> Result<TryOnConfig> {
        let path = self.paths.config_file()?;
        let config = load_file(&path)?;
        let config = apply_overrides(config, |name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }
}

/// Reads `path`, or returns the defaults if it does not exist.
pub fn load_file(path: &Path) -> Result<TryOnConfig> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(TryOnConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    debug!("Loaded config from {}", path.display());
    TryOnConfig::from_toml_str(&content)
}

/// Applies `FITIFY_*` overrides looked up through `lookup`.
pub fn apply_overrides<F>(mut config: TryOnConfig, lookup: F) -> Result<TryOnConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(url) = lookup(ENV_ENGINE_URL) {
        config.engine.base_url = url;
    }
    if let Some(url) = lookup(ENV_MEDIA_URL) {
        config.wardrobe.media_url = url;
    }
    if let Some(raw) = lookup(ENV_USER_ID) {
        let user_id = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| FitifyError::config(format!("{ENV_USER_ID} must be a number, got '{raw}'")))?;
        config.engine.user_id = Some(user_id);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(FitifyPaths::new(Some(temp_dir.path().to_path_buf())));
        let config = load_file(&service.paths.config_file().unwrap()).unwrap();
        assert_eq!(config, TryOnConfig::default());
    }

    #[test]
    fn test_file_is_read_and_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[cache]\ncapacity = 32\n\n[logging]\nfilter = \"debug\"\n",
        )
        .unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.cache.capacity, Some(32));
        assert_eq!(config.logging.filter, "debug");

        let service = ConfigService::new(FitifyPaths::new(Some(temp_dir.path().to_path_buf())));
        let first = service.get_config().unwrap();
        std::fs::write(&path, "[cache]\ncapacity = 64\n").unwrap();
        assert_eq!(service.get_config().unwrap().cache.capacity, first.cache.capacity);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().cache.capacity, Some(64));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[poses]\ninstructions = []\n").unwrap();
        assert!(load_file(&path).unwrap_err().is_config());

        std::fs::write(&path, "[cache\n").unwrap();
        assert!(load_file(&path).unwrap_err().is_serialization());
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_overrides(
            TryOnConfig::default(),
            env(&[
                (ENV_ENGINE_URL, "https://engine.example.com"),
                (ENV_MEDIA_URL, "https://media.example.com"),
                (ENV_USER_ID, "42"),
            ]),
        )
        .unwrap();
        assert_eq!(config.engine.base_url, "https://engine.example.com");
        assert_eq!(config.wardrobe.media_url, "https://media.example.com");
        assert_eq!(config.engine.user_id, Some(42));

        let untouched = apply_overrides(TryOnConfig::default(), env(&[(ENV_ENGINE_URL, " ")]))
            .unwrap();
        assert_eq!(untouched, TryOnConfig::default());

        let err = apply_overrides(TryOnConfig::default(), env(&[(ENV_USER_ID, "abc")]))
            .unwrap_err();
        assert!(err.is_config());
    }
}
