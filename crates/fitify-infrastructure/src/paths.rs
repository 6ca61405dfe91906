//! Path management for Fitify configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/fitify/            # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/fitify/       # Data directory
//! └── store/                   # Key-value store, one JSON file per key
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "fitify";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// No platform config directory (usually no home directory).
    ConfigDirNotFound,
    /// No platform data directory.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::DataDirNotFound => write!(f, "Cannot find data directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for fitify_core::FitifyError {
    fn from(err: PathError) -> Self {
        fitify_core::FitifyError::io(err.to_string())
    }
}

/// Resolves Fitify's directories.
///
/// With a base directory every path lives under it (`<base>/config.toml`,
/// `<base>/data`); otherwise the platform directories from `dirs` are used.
#[derive(Debug, Clone, Default)]
pub struct FitifyPaths {
    base: Option<PathBuf>,
}

impl FitifyPaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::DataDirNotFound),
        }
    }

    /// Directory backing [`crate::FileKeyValueStore`].
    pub fn store_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("store"))
    }
}
