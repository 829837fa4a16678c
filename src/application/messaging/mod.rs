//! Message handling - Command parsing, routing and reply formatting

pub mod dispatcher;
pub mod parser;
pub mod reply;

pub use dispatcher::MessageDispatcher;
