//! Update receiver with long polling.

use crate::client::TelegramClient;
use crate::types::Update;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Receiver that polls `getUpdates` and acknowledges what it yields.
pub struct UpdateReceiver {
    client: TelegramClient,
    poll_interval: Duration,
}

impl UpdateReceiver {
    /// Create a new update receiver.
    pub fn new(client: TelegramClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }

    /// Start receiving updates as an async stream.
    ///
    /// The offset advances past every update yielded, so each update is
    /// delivered at most once.
    pub fn stream(self) -> impl Stream<Item = Update> {
        async_stream::stream! {
            let mut offset: Option<i64> = None;
            let long_poll_secs = self.client.long_poll_timeout_secs();
            loop {
                match self.client.get_updates(offset, long_poll_secs).await {
                    Ok(updates) => {
                        for update in updates {
                            offset = Some(update.update_id + 1);
                            debug!("Received update {}", update.update_id);
                            yield update;
                        }
                    }
                    Err(e) => {
                        error!("Receive error: {}", e);
                        // Back off on error
                        sleep(Duration::from_secs(5)).await;
                        continue;
                    }
                }

                sleep(self.poll_interval).await;
            }
        }
    }
}
