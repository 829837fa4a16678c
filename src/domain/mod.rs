//! Domain layer - Core types with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core objects (User, InboundMessage, Command)
//! - Traits: Abstractions for infrastructure (Bot)

pub mod entities;
pub mod traits;
