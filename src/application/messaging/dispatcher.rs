//! Message dispatcher - Routes commands to their handlers

use chrono::Utc;

use crate::application::errors::BotError;
use crate::application::services::{GenerationService, SearchService};
use crate::domain::entities::{Command, CommandKind, InboundMessage};
use crate::domain::traits::Bot;
use super::parser::MessageParser;
use super::reply;

/// Routes inbound messages to the command handlers and sends the replies.
///
/// Holds no per-message state, so one dispatcher is shared by every event
/// task the transport spawns.
pub struct MessageDispatcher {
    parser: MessageParser,
    generation: GenerationService,
    search: SearchService,
}

impl MessageDispatcher {
    pub fn new(generation: GenerationService, search: SearchService) -> Self {
        Self {
            parser: MessageParser::default(),
            generation,
            search,
        }
    }

    pub fn generation(&self) -> &GenerationService {
        &self.generation
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    /// Handle one inbound message; messages that are not commands are ignored
    pub async fn dispatch(&self, bot: &dyn Bot, message: &InboundMessage) -> Result<(), BotError> {
        let Some(command) = self.parser.parse(message) else {
            return Ok(());
        };

        tracing::info!(
            command = %command.name,
            message_id = %message.id,
            user = %message.author,
            user_id = %message.author.id,
            user_is_bot = message.author.is_bot,
            channel = %message.channel_id,
            guild = message.guild_label(),
            "Received command: {}",
            message.content
        );
        let info = bot.bot_info();
        tracing::debug!(bot = %info.name, bot_id = %info.id, "Dispatching {}", command.name);

        match command.kind() {
            Some(CommandKind::Hello) => self.hello(bot, message).await?,
            Some(CommandKind::Ask) => {
                if !self.ask(bot, message, &command).await? {
                    return Ok(());
                }
            }
            Some(CommandKind::Search) => {
                if !self.search_web(bot, message, &command).await? {
                    return Ok(());
                }
            }
            Some(CommandKind::Help) => self.help(bot, message).await?,
            None => {
                tracing::warn!(
                    command = %command.name,
                    user = %message.author,
                    user_id = %message.author.id,
                    channel = %message.channel_id,
                    guild = message.guild_label(),
                    "Unknown command: {}",
                    message.content
                );
                bot.send_message(&message.channel_id, &reply::unknown_command(&command.name)).await?;
                return Ok(());
            }
        }

        tracing::info!(
            command = %command.name,
            user = %message.author,
            user_id = %message.author.id,
            channel = %message.channel_id,
            guild = message.guild_label(),
            elapsed_ms = (Utc::now() - message.received_at).num_milliseconds(),
            "Command processed successfully"
        );
        Ok(())
    }

    async fn hello(&self, bot: &dyn Bot, message: &InboundMessage) -> Result<(), BotError> {
        bot.send_message(&message.channel_id, reply::HELLO_REPLY).await
    }

    async fn help(&self, bot: &dyn Bot, message: &InboundMessage) -> Result<(), BotError> {
        bot.send_message(&message.channel_id, &reply::help_text()).await
    }

    /// Returns false when the command stopped early at the usage hint
    async fn ask(&self, bot: &dyn Bot, message: &InboundMessage, command: &Command) -> Result<bool, BotError> {
        if !command.has_argument() {
            tracing::warn!(command = %command.name, user = %message.author, "No prompt given");
            bot.send_message(&message.channel_id, reply::ASK_USAGE).await?;
            return Ok(false);
        }

        let text = {
            let _typing = bot.start_typing(&message.channel_id);
            match self.generation.ask(&command.argument).await {
                Ok(text) => text,
                Err(e) => GenerationService::reply_for(&e).to_string(),
            }
        };

        bot.send_message(&message.channel_id, &text).await?;
        Ok(true)
    }

    /// Returns false when the command stopped early at the usage hint
    async fn search_web(&self, bot: &dyn Bot, message: &InboundMessage, command: &Command) -> Result<bool, BotError> {
        if !command.has_argument() {
            tracing::warn!(command = %command.name, user = %message.author, "No query given");
            bot.send_message(&message.channel_id, reply::SEARCH_USAGE).await?;
            return Ok(false);
        }

        let text = {
            let _typing = bot.start_typing(&message.channel_id);
            match self.search.search(&command.argument).await {
                Ok(text) => text,
                Err(e) => SearchService::reply_for(&e).to_string(),
            }
        };

        if text.chars().count() > reply::MAX_MESSAGE_CHARS {
            tracing::info!(user = %message.author, "Search results too long, truncating");
        }
        bot.send_message(&message.channel_id, &reply::fit_search_reply(text)).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::application::errors::ServiceError;
    use crate::application::services::{generation_service, search_service};
    use crate::domain::entities::User;
    use crate::domain::traits::{BotInfo, TypingGuard};
    use crate::infrastructure::llm::{LLMResult, LLM};
    use crate::infrastructure::search::{SearchDepth, SearchHit, SearchProvider, SearchResult};

    /// Records what the dispatcher sends and how the typing indicator is used
    #[derive(Default)]
    struct RecordingBot {
        sent: Mutex<Vec<(String, String)>>,
        typing_started: AtomicUsize,
        typing_active: Arc<AtomicUsize>,
        typing_seen_while_sending: AtomicUsize,
    }

    impl RecordingBot {
        fn replies(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|(_, text)| text.clone()).collect()
        }
    }

    #[async_trait]
    impl Bot for RecordingBot {
        async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), BotError> {
            if self.typing_active.load(Ordering::SeqCst) > 0 {
                self.typing_seen_while_sending.fetch_add(1, Ordering::SeqCst);
            }
            self.sent.lock().unwrap().push((channel_id.to_string(), text.to_string()));
            Ok(())
        }

        fn start_typing(&self, _channel_id: &str) -> TypingGuard {
            self.typing_started.fetch_add(1, Ordering::SeqCst);
            self.typing_active.fetch_add(1, Ordering::SeqCst);
            let active = self.typing_active.clone();
            TypingGuard::new(move || {
                active.fetch_sub(1, Ordering::SeqCst);
            })
        }

        fn bot_info(&self) -> BotInfo {
            BotInfo { id: "0".to_string(), name: "test".to_string() }
        }
    }

    struct FakeLLM {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        result: Result<String, ()>,
    }

    impl FakeLLM {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), prompts: Mutex::default(), result: Ok(text.to_string()) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), prompts: Mutex::default(), result: Err(()) })
        }
    }

    #[async_trait]
    impl LLM for FakeLLM {
        fn name(&self) -> &str {
            "fake"
        }

        async fn generate(&self, prompt: &str) -> LLMResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.result
                .clone()
                .map_err(|_| ServiceError::Api { status: 500, body: "internal".to_string() })
        }
    }

    struct FakeSearch {
        calls: AtomicUsize,
        hits: Vec<SearchHit>,
    }

    impl FakeSearch {
        fn with_hits(hits: Vec<SearchHit>) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), hits })
        }
    }

    #[async_trait]
    impl SearchProvider for FakeSearch {
        fn name(&self) -> &str {
            "fake"
        }

        async fn search(&self, _query: &str, max_results: usize, _depth: SearchDepth) -> SearchResult<Vec<SearchHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hits.iter().take(max_results).cloned().collect())
        }
    }

    fn dispatcher(llm: Option<Arc<FakeLLM>>, search: Option<Arc<FakeSearch>>) -> MessageDispatcher {
        let llm: Option<Arc<dyn LLM>> = llm.map(|l| l as Arc<dyn LLM>);
        let search: Option<Arc<dyn SearchProvider>> = search.map(|s| s as Arc<dyn SearchProvider>);
        MessageDispatcher::new(GenerationService::new(llm), SearchService::new(search))
    }

    fn message(content: &str) -> InboundMessage {
        InboundMessage::new("123", User::new("42").with_username("alice"), content)
            .with_guild("7")
    }

    async fn run(dispatcher: &MessageDispatcher, content: &str) -> (RecordingBot, Vec<String>) {
        let bot = RecordingBot::default();
        dispatcher.dispatch(&bot, &message(content)).await.unwrap();
        let replies = bot.replies();
        (bot, replies)
    }

    #[tokio::test]
    async fn test_self_messages_are_ignored() {
        let llm = FakeLLM::answering("hi");
        let dispatcher = dispatcher(Some(llm.clone()), None);
        let bot = RecordingBot::default();

        for content in ["!hello", "!ask hi", "!xyz"] {
            dispatcher.dispatch(&bot, &message(content).from_self(true)).await.unwrap();
        }

        assert!(bot.replies().is_empty());
        assert_eq!(bot.typing_started.load(Ordering::SeqCst), 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_commands_are_ignored() {
        let dispatcher = dispatcher(None, None);
        for content in ["hello", " !hello", "", "what is !ask"] {
            let (_, replies) = run(&dispatcher, content).await;
            assert!(replies.is_empty(), "replied to {:?}", content);
        }
    }

    #[tokio::test]
    async fn test_hello_ignores_trailing_text() {
        let dispatcher = dispatcher(None, None);
        let (bot, replies) = run(&dispatcher, "!HELLO there, bot").await;
        assert_eq!(replies, vec!["Hello!"]);
        assert_eq!(bot.sent.lock().unwrap()[0].0, "123");
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let dispatcher = dispatcher(None, None);
        let (_, replies) = run(&dispatcher, "!help").await;
        assert_eq!(replies, vec![reply::help_text()]);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let dispatcher = dispatcher(None, None);
        let (_, replies) = run(&dispatcher, "!xyz something").await;
        assert_eq!(replies, vec!["Unknown command: `!xyz`. Type `!help` to see available commands."]);

        let (_, replies) = run(&dispatcher, "!XYZ").await;
        assert_eq!(replies, vec!["Unknown command: `!xyz`. Type `!help` to see available commands."]);
    }

    #[tokio::test]
    async fn test_ask_without_prompt_shows_usage() {
        let llm = FakeLLM::answering("unused");
        let dispatcher = dispatcher(Some(llm.clone()), None);

        for content in ["!ask", "!ask    ", "!ask \n\t"] {
            let (bot, replies) = run(&dispatcher, content).await;
            assert_eq!(replies, vec![reply::ASK_USAGE]);
            assert_eq!(bot.typing_started.load(Ordering::SeqCst), 0);
        }
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ask_keeps_argument_case_and_replies() {
        let llm = FakeLLM::answering("Rust is a systems language.");
        let dispatcher = dispatcher(Some(llm.clone()), None);

        let (bot, replies) = run(&dispatcher, "!Ask  What Is RUST?  ").await;

        assert_eq!(replies, vec!["Rust is a systems language."]);
        assert_eq!(*llm.prompts.lock().unwrap(), vec!["What Is RUST?"]);
        assert_eq!(bot.typing_started.load(Ordering::SeqCst), 1);
        assert_eq!(bot.typing_active.load(Ordering::SeqCst), 0);
        assert_eq!(bot.typing_seen_while_sending.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ask_without_key_reports_config_error() {
        let dispatcher = dispatcher(None, None);
        let (bot, replies) = run(&dispatcher, "!ask anything").await;
        assert_eq!(replies, vec![generation_service::NOT_CONFIGURED_REPLY]);
        assert_eq!(bot.typing_active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ask_failure_replies_with_apology_and_releases_typing() {
        let llm = FakeLLM::failing();
        let dispatcher = dispatcher(Some(llm.clone()), None);

        let (bot, replies) = run(&dispatcher, "!ask break please").await;

        assert_eq!(replies, vec![generation_service::FAILURE_REPLY]);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        assert_eq!(bot.typing_started.load(Ordering::SeqCst), 1);
        assert_eq!(bot.typing_active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_without_query_shows_usage() {
        let search = FakeSearch::with_hits(vec![]);
        let dispatcher = dispatcher(None, Some(search.clone()));

        for content in ["!search", "!SEARCH   "] {
            let (_, replies) = run(&dispatcher, content).await;
            assert_eq!(replies, vec![reply::SEARCH_USAGE]);
        }
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_without_key_reports_config_error() {
        let dispatcher = dispatcher(None, None);
        let (_, replies) = run(&dispatcher, "!search rust").await;
        assert_eq!(replies, vec![search_service::NOT_CONFIGURED_REPLY]);
    }

    #[tokio::test]
    async fn test_search_formats_results() {
        let search = FakeSearch::with_hits(vec![
            SearchHit::new(Some("A"), Some("u1")),
            SearchHit::new(None, Some("u2")),
        ]);
        let dispatcher = dispatcher(None, Some(search.clone()));

        let (bot, replies) = run(&dispatcher, "!search Rust Lang").await;

        assert_eq!(replies, vec!["Title: A\nURL: <u1>\n\nTitle: N/A\nURL: <u2>"]);
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
        assert_eq!(bot.typing_started.load(Ordering::SeqCst), 1);
        assert_eq!(bot.typing_active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_truncates_long_results() {
        let long_title = "t".repeat(600);
        let hits = (0..5)
            .map(|i| SearchHit::new(Some(&long_title), Some(&format!("https://example.com/{}", i))))
            .collect();
        let search = FakeSearch::with_hits(hits);
        let dispatcher = dispatcher(None, Some(search));

        let (_, replies) = run(&dispatcher, "!search long").await;

        assert_eq!(replies.len(), 1);
        let text = &replies[0];
        assert!(text.starts_with(reply::TRUNCATION_PREFIX));
        assert!(text.ends_with(reply::TRUNCATION_SUFFIX));
        assert!(text.chars().count() <= reply::MAX_MESSAGE_CHARS);
    }

    #[tokio::test]
    async fn test_send_failure_is_returned() {
        struct BrokenBot;

        #[async_trait]
        impl Bot for BrokenBot {
            async fn send_message(&self, _channel_id: &str, _text: &str) -> Result<(), BotError> {
                Err(BotError::Transport("missing permissions".to_string()))
            }

            fn start_typing(&self, _channel_id: &str) -> TypingGuard {
                TypingGuard::noop()
            }

            fn bot_info(&self) -> BotInfo {
                BotInfo { id: "0".to_string(), name: "broken".to_string() }
            }
        }

        let dispatcher = dispatcher(None, None);
        let err = dispatcher.dispatch(&BrokenBot, &message("!hello")).await.unwrap_err();
        assert!(matches!(err, BotError::Transport(_)));
    }
}
