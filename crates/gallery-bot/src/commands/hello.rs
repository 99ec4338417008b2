//! `/gallery_hello`

use crate::commands::{CommandContext, CommandHandler};
use crate::error::AppResult;
use crate::format;
use crate::services::BotServices;
use async_trait::async_trait;
use telegram_client::SendOptions;

pub struct HelloHandler {
    services: BotServices,
}

impl HelloHandler {
    pub fn new(services: BotServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CommandHandler for HelloHandler {
    fn name(&self) -> &str {
        "hello"
    }

    fn triggers(&self) -> &[&'static str] {
        &["/gallery_hello"]
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        let Some(user) = ctx.sender() else {
            return self.services.send_text(ctx.chat_id, "Hello").await;
        };

        // Usernames may contain underscores, so only profile links are Markdown
        let options = if user.username.is_some() {
            SendOptions::default()
        } else {
            SendOptions::markdown_v2()
        };
        let greeting = format!("Hello {}", format::mention(user));

        self.services
            .telegram
            .send_message(ctx.chat_id, &greeting, &options)
            .await?;
        Ok(())
    }
}
