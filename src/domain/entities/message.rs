use super::User;
use chrono::{DateTime, Utc};

/// Represents an incoming chat message
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub channel_id: String,
    /// `None` for direct messages
    pub guild_id: Option<String>,
    pub author: User,
    /// True when the bot itself sent the message
    pub author_is_self: bool,
    pub content: String,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(channel_id: impl Into<String>, author: User, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            channel_id: channel_id.into(),
            guild_id: None,
            author,
            author_is_self: false,
            content: content.into(),
            received_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_guild(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    pub fn from_self(mut self, is_self: bool) -> Self {
        self.author_is_self = is_self;
        self
    }

    /// Guild id for log lines, `DM` for direct messages
    pub fn guild_label(&self) -> &str {
        self.guild_id.as_deref().unwrap_or("DM")
    }
}
