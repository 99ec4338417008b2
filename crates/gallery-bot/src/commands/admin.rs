//! `/gallery_admin` menu and the usage prompts behind its buttons.

use crate::commands::{CallbackHandler, CommandContext, CommandHandler};
use crate::error::AppResult;
use crate::services::BotServices;
use async_trait::async_trait;
use telegram_client::{InlineKeyboardButton, InlineKeyboardMarkup, SendOptions};

const GET_IMAGE_PROMPT: &str =
    "GET: type `/get_image` followed by the image id or slug. use `/get_image_meta` for full info";

const UPLOAD_IMAGE_PROMPT: &str = "UPLOAD: reply to a file or image (file is better to prevent TG image compression), then type `/upload_image` with the following optional parameters:
-t title
-ts tags,separated,by,comma
-a artists,separated,by,comma
-s url-slug";

const EDIT_IMAGE_PROMPT: &str = "EDIT: type `/edit_image` with the following required parameter:
-i id-or-slug
optional parameters:
-t title
-ts tags,separated,by,comma
-a artists,separated,by,comma
-s url-slug";

const EDIT_ARTIST_PROMPT: &str = "EDIT: type `/edit_artist` with the following required parameter:
-i id-or-slug
optional parameters:
-n name
-s url-slug
-deca deca username
-foundation foundation username
-instagram instagram username
-superrare superrare username
-twitter twitter username
reply to a file or image to change the profile picture";

/// Button payloads look like `{"callback_data":"get_image_prompt"}`.
fn button(text: &str, callback_data: &str) -> InlineKeyboardButton {
    InlineKeyboardButton {
        text: text.into(),
        callback_data: serde_json::json!({ "callback_data": callback_data }).to_string(),
    }
}

pub struct AdminMenuHandler {
    services: BotServices,
}

impl AdminMenuHandler {
    pub fn new(services: BotServices) -> Self {
        Self { services }
    }

    fn keyboard() -> InlineKeyboardMarkup {
        InlineKeyboardMarkup {
            inline_keyboard: vec![
                vec![
                    button("Get image", "get_image_prompt"),
                    button("Upload image", "upload_image_prompt"),
                ],
                vec![
                    button("Edit image", "edit_image_prompt"),
                    button("Edit artist", "edit_artist_prompt"),
                ],
            ],
        }
    }
}

#[async_trait]
impl CommandHandler for AdminMenuHandler {
    fn name(&self) -> &str {
        "gallery_admin"
    }

    fn triggers(&self) -> &[&'static str] {
        &["/gallery_admin"]
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        self.services
            .require_admin(ctx.chat_id, ctx.sender())
            .await?;

        let options = SendOptions {
            reply_markup: Some(Self::keyboard()),
            ..SendOptions::default()
        };
        self.services
            .telegram
            .send_message(ctx.chat_id, "Gallery admin", &options)
            .await?;
        Ok(())
    }
}

/// Sends the usage text for one admin command.
pub struct PromptHandler {
    services: BotServices,
    callback_data: &'static str,
    text: &'static str,
}

impl PromptHandler {
    pub fn get_image(services: BotServices) -> Self {
        Self {
            services,
            callback_data: "get_image_prompt",
            text: GET_IMAGE_PROMPT,
        }
    }

    pub fn upload_image(services: BotServices) -> Self {
        Self {
            services,
            callback_data: "upload_image_prompt",
            text: UPLOAD_IMAGE_PROMPT,
        }
    }

    pub fn edit_image(services: BotServices) -> Self {
        Self {
            services,
            callback_data: "edit_image_prompt",
            text: EDIT_IMAGE_PROMPT,
        }
    }

    pub fn edit_artist(services: BotServices) -> Self {
        Self {
            services,
            callback_data: "edit_artist_prompt",
            text: EDIT_ARTIST_PROMPT,
        }
    }

    /// All prompts offered by the admin menu.
    pub fn all(services: &BotServices) -> Vec<Self> {
        vec![
            Self::get_image(services.clone()),
            Self::upload_image(services.clone()),
            Self::edit_image(services.clone()),
            Self::edit_artist(services.clone()),
        ]
    }
}

#[async_trait]
impl CallbackHandler for PromptHandler {
    fn callback_data(&self) -> &str {
        self.callback_data
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        self.services
            .require_admin(ctx.chat_id, ctx.sender())
            .await?;

        self.services
            .telegram
            .send_message(ctx.chat_id, self.text, &SendOptions::markdown())
            .await?;
        Ok(())
    }
}
