use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::backend::Backend;
use crate::core::commands::{self, Command};
use crate::core::modes::ModeStore;
use crate::core::router::{route, ContentEvent, Route};
use crate::core::Mode;
use crate::imaging;
use crate::telegram::api::TelegramClient;
use crate::telegram::types::{CallbackQuery, Message, Update};

/// Reply produced for one content event, transmitted immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Photo(String),
}

/// Owns the per-update flow: selection events mutate the mode store,
/// content events are routed to the backend and answered in the chat.
pub struct Dispatcher<B> {
    bot: TelegramClient,
    backend: B,
    modes: ModeStore,
}

impl<B: Backend> Dispatcher<B> {
    pub fn new(bot: TelegramClient, backend: B, modes: ModeStore) -> Self {
        Self {
            bot,
            backend,
            modes,
        }
    }

    pub async fn handle_update(&self, update: Update) -> Result<()> {
        if let Some(query) = update.callback_query {
            return self.handle_selection(query).await;
        }
        if let Some(message) = update.message {
            return self.handle_message(message).await;
        }
        debug!(
            update_id = update.update_id,
            "ignoring update without message or callback"
        );
        Ok(())
    }

    /// Selection event: update the store and acknowledge exactly once by
    /// rewriting the menu message.
    async fn handle_selection(&self, query: CallbackQuery) -> Result<()> {
        self.bot.answer_callback_query(&query.id).await?;

        let Some(message) = query.message else {
            debug!(query_id = %query.id, "callback without originating message");
            return Ok(());
        };
        let Some(mode) = query.data.as_deref().and_then(Mode::parse) else {
            // The menu is a closed surface; anything else is stale or foreign.
            debug!(data = ?query.data, "callback data outside the mode set");
            return Ok(());
        };

        let chat_id = message.chat.id;
        self.modes.set(chat_id, mode);
        info!(chat_id, mode = mode.id(), "mode changed");
        self.bot
            .edit_message_text(chat_id, message.message_id, &commands::selection_ack(mode))
            .await
    }

    async fn handle_message(&self, message: Message) -> Result<()> {
        let chat_id = message.chat.id;

        if let Some(text) = message.text.as_deref() {
            match commands::parse_command(text) {
                Some(Command::Start) => {
                    return self
                        .bot
                        .send_keyboard(chat_id, commands::CHOOSE_PROMPT, &commands::mode_keyboard())
                        .await;
                }
                Some(Command::Help) => {
                    return self.bot.send_message(chat_id, &commands::help_text()).await;
                }
                Some(Command::Other(name)) => {
                    debug!(chat_id, command = %name, "ignoring unhandled command");
                    return Ok(());
                }
                None => {}
            }
        }

        let mode = self.modes.get(chat_id);
        let plan = route(ContentEvent::from_message(&message), mode);
        info!(chat_id, mode = mode.id(), route = plan.name(), "routing message");

        let bot = &self.bot;
        let reply = self
            .run_route(plan, move |file_id| async move {
                let original = bot.download_file(&file_id).await?;
                imaging::to_rgba_png(&original)
            })
            .await?;

        match reply {
            Reply::Text(text) => self.bot.send_message(chat_id, &text).await,
            Reply::Photo(url) => self.bot.send_photo(chat_id, &url).await,
        }
    }

    /// Executes one routing plan against the backend. The variation path
    /// pulls the photo through `fetch_png`, which yields the already
    /// re-encoded RGBA PNG bytes.
    async fn run_route<F, Fut>(&self, plan: Route, fetch_png: F) -> Result<Reply>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Vec<u8>>>,
    {
        match plan {
            Route::VaryImage { file_id } => {
                let png = fetch_png(file_id).await?;
                Ok(Reply::Photo(self.backend.vary_image(png).await?))
            }
            Route::GenerateImage { prompt } => {
                Ok(Reply::Photo(self.backend.generate_image(&prompt).await?))
            }
            Route::Complete { model, prompt } => {
                Ok(Reply::Text(self.backend.complete(model, &prompt).await?))
            }
        }
    }
}

/// Long-poll loop. Each update is handled in its own task; a failed handler
/// only costs that one reply.
pub async fn run_polling<B>(dispatcher: Arc<Dispatcher<B>>, poll_timeout_secs: u64) -> Result<()>
where
    B: Backend + 'static,
{
    let mut offset = 0i64;
    info!("starting long poll");

    loop {
        let updates = match dispatcher.bot.get_updates(offset, poll_timeout_secs).await {
            Ok(updates) => updates,
            Err(e) => {
                error!(error = %e, "getUpdates failed");
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let update_id = update.update_id;
                if let Err(e) = dispatcher.handle_update(update).await {
                    // The reply is dropped; this log is its only trace.
                    error!(update_id, error = %e, "update handler failed");
                }
            });
        }
    }
}
