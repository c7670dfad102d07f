mod backend;
mod config;
mod core;
mod imaging;
mod telegram;

use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::backend::openai::OpenAiClient;
use crate::config::settings::Config;
use crate::core::dispatch::{run_polling, Dispatcher};
use crate::core::modes::{ModeScope, ModeStore};
use crate::core::Mode;
use crate::telegram::api::TelegramClient;

#[derive(Parser, Debug)]
#[command(
    name = "teleprompt",
    version,
    about = "Telegram relay bot for OpenAI text and image models"
)]
struct Args {
    /// Track the selected model per chat instead of globally
    #[arg(long)]
    per_chat_modes: bool,

    /// Initial model (wire identifier, e.g. text-davinci-003)
    #[arg(long, short = 'm')]
    mode: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = Config::load()?;

    // Apply CLI overrides
    if args.per_chat_modes {
        config.mode_scope = ModeScope::PerChat;
    }
    let default_mode = match args.mode.as_deref() {
        Some(id) => Mode::parse(id).ok_or_else(|| {
            let known: Vec<&str> = Mode::ALL.iter().map(|m| m.id()).collect();
            anyhow!("unknown mode {:?}, expected one of: {}", id, known.join(", "))
        })?,
        None => Mode::default(),
    };

    info!(
        scope = ?config.mode_scope,
        mode = default_mode.id(),
        "starting teleprompt"
    );

    let dispatcher = Arc::new(Dispatcher::new(
        TelegramClient::new(&config.bot_token),
        OpenAiClient::new(&config.openai_api_key),
        ModeStore::new(config.mode_scope, default_mode),
    ));
    run_polling(dispatcher, config.poll_timeout_secs).await
}
