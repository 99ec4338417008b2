//! Bot command and callback handlers.

mod admin;
mod daumen;
mod edit_artist;
mod edit_image;
mod hello;
mod images;
mod standards;
mod upload;

pub use admin::{AdminMenuHandler, PromptHandler};
pub use daumen::DaumenHandler;
pub use edit_artist::EditArtistHandler;
pub use edit_image::EditImageHandler;
pub use hello::HelloHandler;
pub use images::{GetImageHandler, RandomImageHandler};
pub use standards::StandardsHandler;
pub use upload::UploadHandler;

use crate::error::AppResult;
use async_trait::async_trait;
use telegram_client::{ChatId, Message, Update, User};

/// What a handler gets to work with for one update.
pub struct CommandContext<'a> {
    pub update: &'a Update,
    pub chat_id: ChatId,
    /// Text after the trigger and optional `@botname`, leading whitespace removed.
    pub args: &'a str,
}

impl<'a> CommandContext<'a> {
    pub fn sender(&self) -> Option<&'a User> {
        self.update.sender()
    }

    /// The command message itself; absent for callback selections.
    pub fn message(&self) -> Option<&'a Message> {
        self.update.message.as_ref()
    }
}

/// Slash command handler.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name used in logs and dispatch outcomes.
    fn name(&self) -> &str;

    /// Literal triggers, e.g. `/upload_image` and its alias `/ui`.
    fn triggers(&self) -> &[&'static str];

    /// Execute the command.
    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()>;
}

/// Handler for an inline keyboard selection.
#[async_trait]
pub trait CallbackHandler: Send + Sync {
    /// Value of `callback_data` in the button payload.
    fn callback_data(&self) -> &str;

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()>;
}
