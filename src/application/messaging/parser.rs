//! Message parser - Turns raw message text into commands

use crate::domain::entities::{Command, InboundMessage, COMMAND_MARKER};

/// Splits command messages into a name and an argument
pub struct MessageParser {
    marker: char,
}

impl MessageParser {
    pub fn new(marker: char) -> Self {
        Self { marker }
    }

    /// Parse a message, or `None` when it is not addressed to the bot
    pub fn parse(&self, message: &InboundMessage) -> Option<Command> {
        if message.author_is_self {
            return None;
        }
        self.parse_text(&message.content)
    }

    /// Parse raw text; the name is lower-cased, the argument keeps its case
    pub fn parse_text(&self, text: &str) -> Option<Command> {
        if !text.starts_with(self.marker) {
            return None;
        }

        let token = text.split_whitespace().next()?;
        let argument = text[token.len()..].trim();

        Some(Command::new(token.to_lowercase(), argument))
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new(COMMAND_MARKER)
    }
}
