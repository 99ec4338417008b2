//! Gallery Bot - Main entry point.

use anyhow::Context;
use gallery_bot::config::{Config, UpdateMode};
use gallery_bot::webhook::{create_router, process_update, AppState};
use gallery_bot::{AppResult, BotServices, DispatchSettings, Dispatcher};
use gallery_client::GalleryClient;
use std::sync::Arc;
use telegram_client::{TelegramClient, UpdateReceiver};
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting Gallery Bot...");

    // Initialize clients
    let telegram = Arc::new(
        TelegramClient::new(
            &config.telegram.api_url,
            &config.telegram.bot_token,
            config.telegram.timeout,
        )
        .context("Failed to create Telegram client")?,
    );

    let gallery = Arc::new(
        GalleryClient::new(
            &config.gallery.api_token,
            &config.gallery.api_url,
            config.gallery.media_url(),
            config.gallery.timeout,
        )
        .context("Failed to create gallery client")?,
    );

    // Health checks
    if telegram.health_check().await {
        info!("Telegram API healthy");
    } else {
        warn!("Telegram API check failed - will retry on requests");
    }

    if gallery.health_check().await {
        info!("Gallery API healthy at {}", config.gallery.api_url);
    } else {
        warn!("Gallery API check failed - tag indexes will be built lazily");
    }

    let services = BotServices::new(telegram.clone(), gallery);

    let report = services
        .tags
        .initialize(&config.telegram.allowed_chat_ids, services.tag_source())
        .await;
    if !report.failed.is_empty() {
        warn!("No tag index yet for chats {:?}", report.failed);
    }

    let dispatcher = Arc::new(Dispatcher::new(
        services,
        DispatchSettings {
            bot_username: config.telegram.bot_username.clone(),
            min_tag_lookup_chars: config.bot.min_tag_lookup_chars,
        },
    ));
    info!("Registered {} command triggers", dispatcher.commands().len());

    let state = AppState::new(
        dispatcher,
        telegram.clone(),
        config.telegram.allowed_chat_ids.iter().copied(),
        config.telegram.webhook_url.clone(),
        config.telegram.webhook_secret.clone(),
    );

    match config.telegram.mode {
        UpdateMode::Webhook => {
            let addr = config.server.socket_addr()?;
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Listening for webhook deliveries on {}", addr);

            axum::serve(listener, create_router(state))
                .with_graceful_shutdown(async {
                    signal::ctrl_c().await.ok();
                    info!("Shutdown signal received");
                })
                .await?;
        }
        UpdateMode::Polling => {
            // getUpdates is refused while a webhook is set
            if let Err(e) = telegram.delete_webhook().await {
                warn!("Failed to delete webhook: {}", e);
            }

            let receiver =
                UpdateReceiver::new(telegram.as_ref().clone(), config.telegram.poll_interval);
            let mut stream = Box::pin(receiver.stream());
            info!("Polling for updates...");

            loop {
                tokio::select! {
                    Some(update) = stream.next() => {
                        process_update(&state, &update).await;
                    }
                    _ = signal::ctrl_c() => {
                        info!("Shutdown signal received");
                        break;
                    }
                }
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
