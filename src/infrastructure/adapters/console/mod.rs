//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::{InboundMessage, User};
use crate::domain::traits::{Bot, BotInfo, TypingGuard};

/// Channel id used for every console message
const CONSOLE_CHANNEL: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "askbot".to_string(),
            },
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn send_message(&self, _channel_id: &str, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        Ok(())
    }

    fn start_typing(&self, _channel_id: &str) -> TypingGuard {
        println!("[BOT is typing...]");
        TypingGuard::noop()
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Read commands from stdin until EOF and answer them on stdout
pub async fn run(dispatcher: Arc<MessageDispatcher>) -> Result<(), BotError> {
    let bot = ConsoleAdapter::new();
    let user = User::new("console").with_username("you");
    tracing::info!("Starting console bot (dev mode); type !help, Ctrl-D to quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::Internal(format!("failed to read stdin: {}", e)))?
    {
        let message = InboundMessage::new(CONSOLE_CHANNEL, user.clone(), line);
        if let Err(e) = dispatcher.dispatch(&bot, &message).await {
            tracing::error!("Failed to handle console message: {}", e);
        }
    }

    tracing::info!("Console closed");
    Ok(())
}
