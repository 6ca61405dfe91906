//! Infrastructure for Fitify: filesystem paths, configuration loading,
//! key-value stores, the generation history repository and logging setup.

pub mod config_service;
pub mod generation_repository;
pub mod logging;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use generation_repository::{GENERATED_IMAGES_KEY, KeyValueGenerationRepository};
pub use paths::{FitifyPaths, PathError};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
