//! `/edit_artist` (`/ea`)

use crate::commands::{CommandContext, CommandHandler};
use crate::error::{AppError, AppResult};
use crate::format;
use crate::parser::parse_edit_artist;
use crate::services::BotServices;
use async_trait::async_trait;
use tracing::info;

pub struct EditArtistHandler {
    services: BotServices,
}

impl EditArtistHandler {
    pub fn new(services: BotServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CommandHandler for EditArtistHandler {
    fn name(&self) -> &str {
        "edit_artist"
    }

    fn triggers(&self) -> &[&'static str] {
        &["/edit_artist", "/ea"]
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        self.services
            .require_admin(ctx.chat_id, ctx.sender())
            .await?;

        let params = parse_edit_artist(ctx.args);
        let id_or_slug = params.id.value().ok_or(AppError::MissingParameter("-i"))?;

        let previous = self.services.gallery.get_artist(id_or_slug).await?;
        let data = params.merge(&previous);
        let picture = match ctx.message() {
            Some(message) => self.services.fetch_upload(message).await?,
            None => None,
        };

        self.services
            .gallery
            .edit_artist(previous.id, &data, picture)
            .await?;
        info!("Edited artist {} from chat {}", previous.id, ctx.chat_id);
        self.services.invalidate_tags().await;

        // The edit response may lag behind picture processing
        let artist = self
            .services
            .gallery
            .get_artist(&previous.id.to_string())
            .await?;
        let info = format::artist_info(&artist);

        match self.services.gallery.artist_picture_url(&artist) {
            Some(url) => {
                self.services
                    .telegram
                    .send_photo(ctx.chat_id, &url, Some(&info))
                    .await?;
            }
            None => self.services.send_text(ctx.chat_id, &info).await?,
        }

        self.services.rebuild_tags(ctx.chat_id).await;
        Ok(())
    }
}
