//! Domain entities - Core objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;

pub use user::User;
pub use message::InboundMessage;
pub use command::{Command, CommandKind, COMMAND_MARKER};
