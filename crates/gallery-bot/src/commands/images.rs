//! Image lookup commands: `/meme`, `/random_image`, `/get_random_image_meta`,
//! `/get_image`, `/get_image_meta`.

use crate::commands::{CommandContext, CommandHandler};
use crate::error::{AppError, AppResult};
use crate::services::BotServices;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Random image, optionally restricted to the tag given as argument.
pub struct RandomImageHandler {
    services: BotServices,
    with_info: bool,
}

impl RandomImageHandler {
    /// `/meme` and `/random_image`: just the picture.
    pub fn new(services: BotServices) -> Self {
        Self {
            services,
            with_info: false,
        }
    }

    /// `/get_random_image_meta`: picture captioned with its info.
    pub fn with_info(services: BotServices) -> Self {
        Self {
            services,
            with_info: true,
        }
    }

    /// Map the typed tag to its canonical title when the chat knows it.
    async fn resolve_tag(&self, ctx: &CommandContext<'_>, tag: &str) -> String {
        match self
            .services
            .tags
            .lookup_fresh(ctx.chat_id, tag, self.services.tag_source())
            .await
        {
            Ok(Some(title)) => title,
            Ok(None) => tag.to_string(),
            Err(e) => {
                warn!("Tag lookup failed, using tag as typed: {}", e);
                tag.to_string()
            }
        }
    }
}

#[async_trait]
impl CommandHandler for RandomImageHandler {
    fn name(&self) -> &str {
        if self.with_info {
            "get_random_image_meta"
        } else {
            "random_image"
        }
    }

    fn triggers(&self) -> &[&'static str] {
        if self.with_info {
            &["/get_random_image_meta"]
        } else {
            &["/meme", "/random_image"]
        }
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        let tag = ctx.args.trim();
        let tag = if tag.is_empty() {
            None
        } else {
            Some(self.resolve_tag(ctx, tag).await)
        };
        debug!("Random image for tag {:?}", tag);

        let image = self.services.gallery.get_random_image(tag.as_deref()).await?;
        self.services
            .send_image(ctx.chat_id, image.as_ref(), self.with_info)
            .await
    }
}

/// Image by id or slug.
pub struct GetImageHandler {
    services: BotServices,
    with_info: bool,
}

impl GetImageHandler {
    /// `/get_image`
    pub fn new(services: BotServices) -> Self {
        Self {
            services,
            with_info: false,
        }
    }

    /// `/get_image_meta`
    pub fn with_info(services: BotServices) -> Self {
        Self {
            services,
            with_info: true,
        }
    }
}

#[async_trait]
impl CommandHandler for GetImageHandler {
    fn name(&self) -> &str {
        if self.with_info {
            "get_image_meta"
        } else {
            "get_image"
        }
    }

    fn triggers(&self) -> &[&'static str] {
        if self.with_info {
            &["/get_image_meta"]
        } else {
            &["/get_image"]
        }
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        let id_or_slug = ctx
            .args
            .split_whitespace()
            .next()
            .ok_or(AppError::MissingParameter("image id or slug"))?;

        let image = match self.services.gallery.get_image(id_or_slug).await {
            Ok(image) => Some(image),
            Err(gallery_client::GalleryError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        self.services
            .send_image(ctx.chat_id, image.as_ref(), self.with_info)
            .await
    }
}
