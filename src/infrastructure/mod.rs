//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Credential loading
//! - LLM: Text generation providers (Gemini)
//! - Search: Web search providers (Tavily)
//! - Adapters: Platform integrations (Discord, console)

pub mod config;
pub mod llm;
pub mod search;
pub mod adapters;
