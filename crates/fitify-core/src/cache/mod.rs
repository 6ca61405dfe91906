//! Generation cache module.
//!
//! - `key`: the (base identity, garment, pose) cache key (`CacheKey`)
//! - `store`: in-memory memoization with optional LRU bound (`GenerationCache`)
//! - `record`: persisted generation history entries (`GeneratedImage`)
//! - `repository`: persistence trait for generation history (`GenerationRepository`)

mod key;
mod record;
mod repository;
mod store;

pub use key::CacheKey;
pub use record::{GeneratedImage, NewGeneratedImage};
pub use repository::GenerationRepository;
pub use store::{CacheCapacity, GenerationCache};
