//! Key-value stores and the atomic file primitive behind them.

mod atomic_file;
mod file_store;
mod memory_store;

pub use atomic_file::{AtomicFile, AtomicFileError};
pub use file_store::FileKeyValueStore;
pub use memory_store::InMemoryKeyValueStore;
