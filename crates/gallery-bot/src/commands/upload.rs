//! `/upload_image` (`/ui`) - add the replied-to file to the gallery.

use crate::commands::{CommandContext, CommandHandler};
use crate::error::{AppError, AppResult};
use crate::parser::parse_upload;
use crate::services::BotServices;
use async_trait::async_trait;
use tracing::info;

pub struct UploadHandler {
    services: BotServices,
}

impl UploadHandler {
    pub fn new(services: BotServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CommandHandler for UploadHandler {
    fn name(&self) -> &str {
        "upload_image"
    }

    fn triggers(&self) -> &[&'static str] {
        &["/upload_image", "/ui"]
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        self.services
            .require_admin(ctx.chat_id, ctx.sender())
            .await?;

        let params = parse_upload(ctx.args);
        let file = match ctx.message() {
            Some(message) => self.services.fetch_upload(message).await?,
            None => None,
        }
        .ok_or(AppError::MissingAttachment)?;

        let image = self
            .services
            .gallery
            .upload_image(&params.to_new_image(), Some(file))
            .await?;
        info!("Uploaded image {} from chat {}", image.id, ctx.chat_id);
        self.services.invalidate_tags().await;

        self.services
            .send_image(ctx.chat_id, Some(&image), true)
            .await?;
        self.services.rebuild_tags(ctx.chat_id).await;
        Ok(())
    }
}
