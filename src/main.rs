use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod domain;
mod application;
mod infrastructure;

use application::errors::BotError;
use application::messaging::MessageDispatcher;
use application::services::{GenerationService, SearchService};
use infrastructure::adapters::{console, discord};
use infrastructure::config::Credentials;
use infrastructure::llm::{GeminiProvider, LLM};
use infrastructure::search::{SearchProvider, TavilyProvider};

#[derive(Parser)]
#[command(name = "askbot")]
#[command(about = "Discord bot answering questions with Gemini and searching the web with Tavily", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Append-only log file
    #[arg(short, long, default_value = "bot.log")]
    log_file: PathBuf,

    /// Discord bot token (overrides DISCORD_BOT_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve commands (default)
    Run,
    /// Answer commands typed on stdin, without connecting to Discord
    Console,
    /// Report which credentials are configured
    Check,
    /// Show version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Seed the environment before anything reads it
    let dotenv = dotenvy::dotenv();
    let _log_guard = init_logging(&cli.log_file);

    match dotenv {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot(cli.token),
        Commands::Console => run_console(),
        Commands::Check => check(cli.token),
        Commands::Version => {
            println!("askbot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
}

/// Log to stdout and, when it can be opened, to an append-only file
fn init_logging(log_file: &Path) -> Option<WorkerGuard> {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(env_filter());

    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter());

            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry().with(stdout_layer).init();
            tracing::warn!("Cannot open log file {}: {}; logging to stdout only", log_file.display(), e);
            None
        }
    }
}

/// Wire the providers that have credentials into a dispatcher
fn build_dispatcher(credentials: &Credentials) -> MessageDispatcher {
    let llm = credentials.gemini_api_key.as_ref().map(|key| {
        let gemini = GeminiProvider::new(key.clone(), credentials.gemini_model.as_deref());
        tracing::info!("Using Gemini model {} for !ask", gemini.model());
        Arc::new(gemini) as Arc<dyn LLM>
    });

    let search = credentials.tavily_api_key.as_ref().map(|key| {
        Arc::new(TavilyProvider::new(key.clone())) as Arc<dyn SearchProvider>
    });

    MessageDispatcher::new(GenerationService::new(llm), SearchService::new(search))
}

fn runtime() -> Result<tokio::runtime::Runtime, BotError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("failed to start async runtime: {}", e)))
}

/// The chat token, or the fatal error that stops `run` before any connection
fn require_token(credentials: &Credentials) -> Result<String, BotError> {
    match credentials.discord_token() {
        Ok(token) => Ok(token.to_string()),
        Err(e) => {
            tracing::error!("DISCORD_BOT_TOKEN not found. The bot cannot start.");
            Err(e.into())
        }
    }
}

fn run_bot(token_override: Option<String>) -> Result<(), BotError> {
    serve(Credentials::load_env().with_token_override(token_override))
}

fn serve(credentials: Credentials) -> Result<(), BotError> {
    let token = require_token(&credentials)?;
    let dispatcher = Arc::new(build_dispatcher(&credentials));
    runtime()?.block_on(discord::run(&token, dispatcher))
}

fn run_console() -> Result<(), BotError> {
    let credentials = Credentials::load_env();
    let dispatcher = Arc::new(build_dispatcher(&credentials));
    runtime()?.block_on(console::run(dispatcher))
}

fn check(token_override: Option<String>) -> Result<(), BotError> {
    let credentials = Credentials::load_env().with_token_override(token_override);

    for (var, present) in credentials.status() {
        println!("{:<20} {}", var, if present { "set" } else { "missing" });
    }

    credentials.discord_token()?;
    Ok(())
}
