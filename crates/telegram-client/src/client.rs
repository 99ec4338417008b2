//! Telegram Bot API HTTP client.

use crate::error::TelegramError;
use crate::types::*;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Headroom left between the long-poll wait and the HTTP timeout.
const LONG_POLL_MARGIN_SECS: u64 = 5;

/// Telegram Bot API client.
///
/// The bot token is part of every request path, so it is kept in a
/// `SecretString` and never appears in logs.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: SecretString,
    timeout: Duration,
}

impl TelegramClient {
    /// Create a new Telegram client.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: SecretString::new(token.into()),
            timeout,
        })
    }

    /// Seconds a `getUpdates` call may wait, kept below the HTTP timeout.
    pub fn long_poll_timeout_secs(&self) -> u64 {
        self.timeout
            .as_secs()
            .saturating_sub(LONG_POLL_MARGIN_SECS)
            .max(1)
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            method
        )
    }

    /// Invoke a Bot API method with a JSON payload.
    async fn call<P, T>(&self, method: &str, payload: &P) -> Result<T, TelegramError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(TelegramError::Api {
                    code: Some(status.as_u16() as i64),
                    description: body,
                })
            }
        };

        match parsed.result {
            Some(result) if parsed.ok => Ok(result),
            _ => {
                let description = parsed
                    .description
                    .unwrap_or_else(|| format!("{} failed", method));
                warn!("Telegram {} failed: {}", method, description);
                Err(TelegramError::Api {
                    code: parsed.error_code,
                    description,
                })
            }
        }
    }

    /// Check the token by calling `getMe`.
    pub async fn health_check(&self) -> bool {
        self.get_me().await.is_ok()
    }

    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Send a text message.
    #[instrument(skip(self, text, options))]
    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        options: &SendOptions,
    ) -> Result<Message, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: options.parse_mode,
            reply_markup: options.reply_markup.as_ref(),
        };

        let message = self.call("sendMessage", &request).await?;
        debug!("Sent message to {}", chat_id);
        Ok(message)
    }

    /// Send a photo by URL, Telegram fetches it itself.
    #[instrument(skip(self, caption))]
    pub async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: Option<&str>,
    ) -> Result<Message, TelegramError> {
        let request = SendPhotoRequest {
            chat_id,
            photo: photo_url,
            caption,
        };

        let message = self.call("sendPhoto", &request).await?;
        debug!("Sent photo to {}", chat_id);
        Ok(message)
    }

    #[instrument(skip(self))]
    pub async fn get_chat_member(
        &self,
        chat_id: ChatId,
        user_id: i64,
    ) -> Result<ChatMember, TelegramError> {
        self.call(
            "getChatMember",
            &serde_json::json!({ "chat_id": chat_id, "user_id": user_id }),
        )
        .await
    }

    /// Whether the user is the creator or an administrator of the chat.
    pub async fn is_chat_admin(&self, chat_id: ChatId, user_id: i64) -> Result<bool, TelegramError> {
        let member = self.get_chat_member(chat_id, user_id).await?;
        Ok(member.status.is_admin())
    }

    #[instrument(skip(self))]
    pub async fn get_file(&self, file_id: &str) -> Result<File, TelegramError> {
        self.call("getFile", &serde_json::json!({ "file_id": file_id }))
            .await
    }

    /// Download the contents of a file previously resolved with `get_file`.
    #[instrument(skip(self))]
    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>, TelegramError> {
        let response = self
            .client
            .get(format!(
                "{}/file/bot{}/{}",
                self.base_url,
                self.token.expose_secret(),
                file_path
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(TelegramError::Api {
                code: Some(status.as_u16() as i64),
                description: format!("file download failed with {}", status),
            });
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Resolve and download a file in one step.
    pub async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, TelegramError> {
        let file = self.get_file(file_id).await?;
        let path = file
            .file_path
            .ok_or_else(|| TelegramError::MissingFilePath(file_id.to_string()))?;
        self.download_file(&path).await
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramError> {
        let mut payload = serde_json::json!({ "callback_query_id": callback_query_id });
        if let Some(t) = text {
            payload["text"] = serde_json::json!(t);
        }

        let _: bool = self.call("answerCallbackQuery", &payload).await?;
        Ok(())
    }

    /// Register the webhook URL. Telegram echoes `secret_token` back in the
    /// `X-Telegram-Bot-Api-Secret-Token` header of every delivery.
    #[instrument(skip(self, secret_token))]
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<(), TelegramError> {
        let mut payload = serde_json::json!({
            "url": url,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(secret) = secret_token {
            payload["secret_token"] = serde_json::json!(secret);
        }

        let _: bool = self.call("setWebhook", &payload).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let _: bool = self.call("deleteWebhook", &serde_json::json!({})).await?;
        Ok(())
    }

    /// Long-poll for pending updates.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut payload = serde_json::json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(offset) = offset {
            payload["offset"] = serde_json::json!(offset);
        }

        let updates: Vec<Update> = self.call("getUpdates", &payload).await?;
        debug!("Received {} updates", updates.len());
        Ok(updates)
    }
}
