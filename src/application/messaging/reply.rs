//! Reply texts and length limits for outbound messages

use crate::domain::entities::{CommandKind, COMMAND_MARKER};

/// Longest message the chat transport accepts, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Characters of an oversized search result that are kept
pub const TRUNCATED_CHARS: usize = 1900;

pub const TRUNCATION_PREFIX: &str = "Search results are too long. Here's a part of it:\n";
pub const TRUNCATION_SUFFIX: &str = "...";

pub const HELLO_REPLY: &str = "Hello!";
pub const ASK_USAGE: &str = "Please provide a prompt after `!ask ` (e.g., `!ask What is AI?`).";
pub const SEARCH_USAGE: &str = "Please provide a query after `!search ` (e.g., `!search Python tutorials`).";

/// Fit a search result into one message
pub fn fit_search_reply(text: String) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text;
    }

    let head: String = text.chars().take(TRUNCATED_CHARS).collect();
    format!("{}{}{}", TRUNCATION_PREFIX, head, TRUNCATION_SUFFIX)
}

/// Help listing, one line per command
pub fn help_text() -> String {
    let mut help = "Available commands:\n".to_string();
    for kind in CommandKind::ALL {
        help.push_str(&format!("`{}` - {}\n", kind.usage(), kind.description()));
    }
    help
}

pub fn unknown_command(name: &str) -> String {
    format!(
        "Unknown command: `{}`. Type `{}help` to see available commands.",
        name, COMMAND_MARKER
    )
}
