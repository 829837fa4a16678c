use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a plain-text message to a channel
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), BotError>;

    /// Show the "typing" indicator in a channel until the returned guard is dropped
    fn start_typing(&self, channel_id: &str) -> TypingGuard;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Keeps a typing indicator alive; releases it when dropped
#[must_use = "the typing indicator stops as soon as the guard is dropped"]
pub struct TypingGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl TypingGuard {
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Guard for transports without a typing indicator
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for TypingGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}
