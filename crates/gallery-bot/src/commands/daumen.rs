//! `/how_daumen_am_i`

use crate::commands::{CommandContext, CommandHandler};
use crate::error::AppResult;
use crate::format;
use crate::services::BotServices;
use async_trait::async_trait;
use rand::Rng;

pub struct DaumenHandler {
    services: BotServices,
}

impl DaumenHandler {
    pub fn new(services: BotServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CommandHandler for DaumenHandler {
    fn name(&self) -> &str {
        "how_daumen"
    }

    fn triggers(&self) -> &[&'static str] {
        &["/how_daumen_am_i"]
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> AppResult<()> {
        let name = ctx.sender().map(format::display_name).unwrap_or("You");
        let percent = rand::thread_rng().gen_range(0..=100);

        self.services
            .send_text(ctx.chat_id, &format!("{} is {}% daumen!", name, percent))
            .await
    }
}
