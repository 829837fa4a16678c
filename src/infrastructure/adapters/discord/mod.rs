//! Discord adapter

use async_trait::async_trait;
use serenity::all::{
    ChannelId, Client, Context, EventHandler, GatewayIntents, Http, Message, Ready, UserId,
};
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::{InboundMessage, User};
use crate::domain::traits::{Bot, BotInfo, TypingGuard};

/// Gateway events the bot subscribes to
fn intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Parse a channel id in its string form
fn parse_channel_id(channel_id: &str) -> Result<ChannelId, BotError> {
    let id: u64 = channel_id
        .parse()
        .map_err(|e| BotError::Parse(format!("invalid channel id {:?}: {}", channel_id, e)))?;
    if id == 0 {
        return Err(BotError::Parse("channel id must be non-zero".to_string()));
    }
    Ok(ChannelId::new(id))
}

/// Discord bot adapter bound to one gateway session's HTTP client
pub struct DiscordAdapter {
    http: Arc<Http>,
    info: BotInfo,
}

impl DiscordAdapter {
    pub fn new(http: Arc<Http>, info: BotInfo) -> Self {
        Self { http, info }
    }
}

#[async_trait]
impl Bot for DiscordAdapter {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), BotError> {
        tracing::debug!("Sending to {}: {} chars", channel_id, text.chars().count());

        let channel = parse_channel_id(channel_id)?;
        channel
            .say(&*self.http, text)
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;
        Ok(())
    }

    fn start_typing(&self, channel_id: &str) -> TypingGuard {
        match parse_channel_id(channel_id) {
            Ok(channel) => {
                let typing = channel.start_typing(&self.http);
                TypingGuard::new(move || {
                    typing.stop();
                })
            }
            Err(e) => {
                tracing::warn!("Cannot show typing indicator: {}", e);
                TypingGuard::noop()
            }
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Convert a gateway message into the domain type
fn to_inbound(msg: &Message, self_id: UserId) -> InboundMessage {
    let mut author = User::new(msg.author.id.to_string()).with_username(msg.author.name.clone());
    if msg.author.bot {
        author = author.as_bot();
    }

    let inbound = InboundMessage::new(msg.channel_id.to_string(), author, msg.content.clone())
        .with_id(msg.id.to_string())
        .from_self(msg.author.id == self_id);

    match msg.guild_id {
        Some(guild_id) => inbound.with_guild(guild_id.to_string()),
        None => inbound,
    }
}

/// Gateway event handler; serenity runs each event in its own task
pub struct DiscordHandler {
    dispatcher: Arc<MessageDispatcher>,
}

impl DiscordHandler {
    pub fn new(dispatcher: Arc<MessageDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn message(&self, ctx: Context, msg: Message) {
        let (self_id, self_name) = {
            let me = ctx.cache.current_user();
            (me.id, me.name.clone())
        };

        let inbound = to_inbound(&msg, self_id);
        let bot = DiscordAdapter::new(
            ctx.http.clone(),
            BotInfo { id: self_id.to_string(), name: self_name },
        );

        if let Err(e) = self.dispatcher.dispatch(&bot, &inbound).await {
            tracing::error!(
                channel = %inbound.channel_id,
                guild = inbound.guild_label(),
                "Failed to handle message from {}: {}",
                inbound.author,
                e
            );
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!("{} has connected to Discord! User ID: {}", ready.user.name, ready.user.id);

        if !self.dispatcher.generation().is_configured() {
            tracing::warn!("GEMINI_API_KEY is not set. Gemini functionality will be disabled for this session.");
        }
        if !self.dispatcher.search().is_configured() {
            tracing::warn!("TAVILY_API_KEY is not set. Tavily search functionality will be disabled for this session.");
        }
    }
}

/// Connect to the gateway and serve until the connection ends
pub async fn run(token: &str, dispatcher: Arc<MessageDispatcher>) -> Result<(), BotError> {
    let token_hint: String = token.chars().take(4).collect();
    tracing::info!("Starting Discord bot (token: {}...)", token_hint);

    let mut client = Client::builder(token, intents())
        .event_handler(DiscordHandler::new(dispatcher))
        .await
        .map_err(|e| BotError::Network(format!("failed to create Discord client: {}", e)))?;

    client
        .start()
        .await
        .map_err(|e| BotError::Network(format!("Discord gateway error: {}", e)))
}
