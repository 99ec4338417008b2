//! `/gallery_standards` - curation guidelines.

use crate::commands::{CommandContext, CommandHandler};
use crate::error::AppResult;
use crate::services::BotServices;
use async_trait::async_trait;

const STANDARDS: &str = "Try to make image titles and tags as intuitive for searching as possible.
Try to reuse existing tag names.
Search the gallery to make sure the image your uploading isn't there already.
If an image is a profile picture, use the \"pfp\" tag.
Use capitalization for titles like a book title (lowercase articles), unless you think it should be an exception.";

pub struct StandardsHandler {
    services: BotServices,
}

impl StandardsHandler {
    pub fn new(services: BotServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CommandHandler for StandardsHandler {
    fn name(&self) -> &str {
        "gallery_standards"
    }

    fn triggers(&self) -> &[&'static str] {
        &["/gallery_standards"]
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        self.services.send_text(ctx.chat_id, STANDARDS).await
    }
}
