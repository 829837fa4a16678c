//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Wrappers around the generation and search providers
//! - Errors: Bot, service and configuration errors
//! - Messaging: Command parsing, dispatching and reply formatting

pub mod errors;
pub mod services;
pub mod messaging;
