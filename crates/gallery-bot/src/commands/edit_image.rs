//! `/edit_image` (`/ei`)

use crate::commands::{CommandContext, CommandHandler};
use crate::error::{AppError, AppResult};
use crate::parser::parse_edit_image;
use crate::services::BotServices;
use async_trait::async_trait;
use tracing::info;

pub struct EditImageHandler {
    services: BotServices,
}

impl EditImageHandler {
    pub fn new(services: BotServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CommandHandler for EditImageHandler {
    fn name(&self) -> &str {
        "edit_image"
    }

    fn triggers(&self) -> &[&'static str] {
        &["/edit_image", "/ei"]
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        self.services
            .require_admin(ctx.chat_id, ctx.sender())
            .await?;

        let params = parse_edit_image(ctx.args);
        let id_or_slug = params.id.value().ok_or(AppError::MissingParameter("-i"))?;

        let previous = self.services.gallery.get_image(id_or_slug).await?;
        let data = params.merge(&previous);
        // Replacement file is optional
        let file = match ctx.message() {
            Some(message) => self.services.fetch_upload(message).await?,
            None => None,
        };

        let image = self
            .services
            .gallery
            .edit_image(previous.id, &data, file)
            .await?;
        info!("Edited image {} from chat {}", image.id, ctx.chat_id);
        self.services.invalidate_tags().await;

        self.services
            .send_image(ctx.chat_id, Some(&image), true)
            .await?;
        self.services.rebuild_tags(ctx.chat_id).await;
        Ok(())
    }
}
