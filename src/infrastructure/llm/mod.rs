//! LLM integration - Text generation providers

pub mod traits;
pub mod providers;

pub use traits::{LLM, LLMResult};
pub use providers::GeminiProvider;
