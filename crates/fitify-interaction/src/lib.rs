//! HTTP collaborators: the image generation engine and the credit ledger.

mod engine_client;
mod engine_generator;
mod engine_ledger;

pub use engine_client::{EngineClient, INSUFFICIENT_CREDIT_CODE, encode_image};
pub use engine_generator::EngineGenerator;
pub use engine_ledger::EngineLedger;
