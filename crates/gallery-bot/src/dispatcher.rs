//! Routes each update to one command handler, a callback handler, or the
//! tag lookup fallback.

use crate::commands::*;
use crate::error::AppResult;
use crate::services::BotServices;
use serde::Deserialize;
use std::sync::Arc;
use tag_index::normalize;
use telegram_client::{CallbackQuery, ChatId, Update};
use tracing::{debug, info, instrument, warn};

/// What the dispatcher did with an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A command handler ran.
    Command(String),
    /// Free text matched a tag; a random image for it was sent.
    TagImage(String),
    /// Free text matched no tag.
    TagMiss,
    /// A callback handler ran.
    Callback(String),
    /// Nothing to do for this update.
    Ignored,
}

/// A trigger bound to its handler.
pub struct CommandDescriptor {
    pub trigger: &'static str,
    pub handler: Arc<dyn CommandHandler>,
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub bot_username: String,
    pub min_tag_lookup_chars: usize,
}

#[derive(Deserialize)]
struct CallbackPayload {
    callback_data: String,
}

pub struct Dispatcher {
    commands: Vec<CommandDescriptor>,
    callbacks: Vec<Arc<dyn CallbackHandler>>,
    services: BotServices,
    settings: DispatchSettings,
}

/// Handlers in matching priority order.
pub fn default_commands(services: &BotServices) -> Vec<Arc<dyn CommandHandler>> {
    vec![
        Arc::new(DaumenHandler::new(services.clone())),
        Arc::new(HelloHandler::new(services.clone())),
        Arc::new(AdminMenuHandler::new(services.clone())),
        Arc::new(RandomImageHandler::new(services.clone())),
        Arc::new(RandomImageHandler::with_info(services.clone())),
        Arc::new(GetImageHandler::with_info(services.clone())),
        Arc::new(GetImageHandler::new(services.clone())),
        Arc::new(UploadHandler::new(services.clone())),
        Arc::new(EditImageHandler::new(services.clone())),
        Arc::new(EditArtistHandler::new(services.clone())),
        Arc::new(StandardsHandler::new(services.clone())),
    ]
}

pub fn default_callbacks(services: &BotServices) -> Vec<Arc<dyn CallbackHandler>> {
    PromptHandler::all(services)
        .into_iter()
        .map(|h| Arc::new(h) as Arc<dyn CallbackHandler>)
        .collect()
}

impl Dispatcher {
    /// Dispatcher with every bot command registered.
    pub fn new(services: BotServices, settings: DispatchSettings) -> Self {
        let commands = default_commands(&services);
        let callbacks = default_callbacks(&services);
        Self::with_handlers(services, settings, commands, callbacks)
    }

    pub fn with_handlers(
        services: BotServices,
        settings: DispatchSettings,
        handlers: Vec<Arc<dyn CommandHandler>>,
        callbacks: Vec<Arc<dyn CallbackHandler>>,
    ) -> Self {
        let commands = handlers
            .into_iter()
            .flat_map(|handler| {
                handler
                    .triggers()
                    .iter()
                    .map(|&trigger| CommandDescriptor {
                        trigger,
                        handler: handler.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Self {
            commands,
            callbacks,
            services,
            settings,
        }
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// First descriptor whose trigger matches, with the arguments after it.
    pub fn match_command<'t>(&self, text: &'t str) -> Option<(&CommandDescriptor, &'t str)> {
        self.commands.iter().find_map(|descriptor| {
            match_trigger(text, descriptor.trigger, &self.settings.bot_username)
                .map(|args| (descriptor, args))
        })
    }

    /// Handle one update. Handler errors are returned to the caller.
    #[instrument(skip(self, update), fields(update_id = update.update_id))]
    pub async fn handle_update(&self, update: &Update) -> AppResult<DispatchOutcome> {
        if let (Some(message), Some(text)) = (&update.message, update.command_text()) {
            let chat_id = message.chat.id;

            if let Some((descriptor, args)) = self.match_command(text) {
                let name = descriptor.handler.name().to_string();
                info!(command = %name, chat_id, "Dispatching command");

                let ctx = CommandContext {
                    update,
                    chat_id,
                    args,
                };
                descriptor.handler.execute(&ctx).await?;
                return Ok(DispatchOutcome::Command(name));
            }

            return self.tag_fallback(chat_id, text).await;
        }

        if let Some(query) = &update.callback_query {
            return self.handle_callback(update, query).await;
        }

        Ok(DispatchOutcome::Ignored)
    }

    /// Free text naming a known tag gets a random image with that tag.
    async fn tag_fallback(&self, chat_id: ChatId, text: &str) -> AppResult<DispatchOutcome> {
        if normalize(text).chars().count() < self.settings.min_tag_lookup_chars.max(1) {
            return Ok(DispatchOutcome::Ignored);
        }

        let title = match self
            .services
            .tags
            .lookup_fresh(chat_id, text, self.services.tag_source())
            .await
        {
            Ok(Some(title)) => title,
            Ok(None) => return Ok(DispatchOutcome::TagMiss),
            Err(e) => {
                warn!("Tag lookup unavailable for chat {}: {}", chat_id, e);
                return Ok(DispatchOutcome::TagMiss);
            }
        };

        debug!("Text matched tag {:?} in chat {}", title, chat_id);
        let image = self
            .services
            .gallery
            .get_random_image(Some(&title))
            .await?;
        self.services
            .send_image(chat_id, image.as_ref(), false)
            .await?;

        Ok(DispatchOutcome::TagImage(title))
    }

    async fn handle_callback(
        &self,
        update: &Update,
        query: &CallbackQuery,
    ) -> AppResult<DispatchOutcome> {
        let Some(chat_id) = query.message.as_ref().map(|m| m.chat.id) else {
            return Ok(DispatchOutcome::Ignored);
        };
        let Some(payload) = query.data.as_deref().and_then(parse_callback_data) else {
            debug!("Ignoring malformed callback payload {:?}", query.data);
            return Ok(DispatchOutcome::Ignored);
        };
        let Some(handler) = self
            .callbacks
            .iter()
            .find(|h| h.callback_data() == payload)
        else {
            debug!("Ignoring unknown callback {}", payload);
            return Ok(DispatchOutcome::Ignored);
        };

        info!(callback = %payload, chat_id, "Dispatching callback");
        let ctx = CommandContext {
            update,
            chat_id,
            args: "",
        };
        let result = handler.execute(&ctx).await;

        // Stop the button's loading spinner whatever the outcome
        if let Err(e) = self
            .services
            .telegram
            .answer_callback_query(&query.id, None)
            .await
        {
            warn!("Failed to answer callback query: {}", e);
        }

        result?;
        Ok(DispatchOutcome::Callback(payload))
    }
}

/// Whether `text` invokes `trigger`, and if so the arguments after it.
///
/// The trigger must be followed by the end of the text, whitespace, or
/// `@<bot_username>` (case-insensitive).
pub fn match_trigger<'t>(text: &'t str, trigger: &str, bot_username: &str) -> Option<&'t str> {
    let rest = text.strip_prefix(trigger)?;

    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return Some(rest.trim_start());
    }

    let mentioned = rest.strip_prefix('@')?;
    let end = mentioned
        .find(char::is_whitespace)
        .unwrap_or(mentioned.len());
    let (username, tail) = mentioned.split_at(end);

    username
        .eq_ignore_ascii_case(bot_username.trim_start_matches('@'))
        .then(|| tail.trim_start())
}

fn parse_callback_data(data: &str) -> Option<String> {
    serde_json::from_str::<CallbackPayload>(data)
        .ok()
        .map(|p| p.callback_data)
}
