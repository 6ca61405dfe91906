//! Domain layer for Fitify virtual try-on sessions.
//!
//! Holds the outfit [`timeline`], the generation [`cache`], and the contracts
//! of the external collaborators (image [`generator`], credit [`ledger`],
//! key-value [`storage`]). Nothing here performs I/O.

pub mod cache;
pub mod config;
pub mod error;
pub mod garment;
pub mod generator;
pub mod image;
pub mod ledger;
pub mod pose;
pub mod storage;
pub mod timeline;

// Re-export common error type
pub use error::{FitifyError, Result};
