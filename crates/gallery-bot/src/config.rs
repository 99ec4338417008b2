//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::net::SocketAddr;
use std::time::Duration;
use telegram_client::ChatId;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Telegram configuration
    pub telegram: TelegramConfig,

    /// Gallery API configuration
    pub gallery: GalleryConfig,

    /// Webhook server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,
}

/// How updates reach the bot.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    #[default]
    Webhook,
    Polling,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,

    /// Bot username, used to accept `/command@username`
    pub bot_username: String,

    /// Bot API base URL
    #[serde(default = "default_telegram_url")]
    pub api_url: String,

    /// Chats the bot serves (comma-separated). Empty serves every chat.
    #[serde(default, deserialize_with = "deserialize_chat_ids")]
    pub allowed_chat_ids: Vec<ChatId>,

    /// Public URL Telegram delivers updates to
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Secret Telegram echoes back on every webhook delivery
    #[serde(default)]
    pub webhook_secret: Option<String>,

    #[serde(default)]
    pub mode: UpdateMode,

    /// Delay between polls in polling mode
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryConfig {
    /// Gallery REST API base URL
    pub api_url: String,

    /// Where rendered images are served from; defaults to the API URL
    #[serde(default)]
    pub media_url: Option<String>,

    /// Gallery API token
    pub api_token: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl GalleryConfig {
    pub fn media_url(&self) -> &str {
        self.media_url.as_deref().unwrap_or(&self.api_url)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.listen_addr, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.listen_addr, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Free text shorter than this (after normalization) is never looked up as a tag
    #[serde(
        default = "default_min_tag_lookup_chars",
        deserialize_with = "deserialize_usize"
    )]
    pub min_tag_lookup_chars: usize,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            min_tag_lookup_chars: default_min_tag_lookup_chars(),
        }
    }
}

// Default value functions
fn default_telegram_url() -> String {
    "https://api.telegram.org".into()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    9000
}

fn default_log_level() -> String {
    "info".into()
}

fn default_min_tag_lookup_chars() -> usize {
    1
}

// Environment values always arrive as strings since `try_parsing` is off.
fn deserialize_chat_ids<'de, D>(deserializer: D) -> Result<Vec<ChatId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_chat_ids(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(serde::de::Error::custom)
}

fn deserialize_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(serde::de::Error::custom)
}

/// Parse a comma-separated chat id list. Blank entries are skipped.
pub fn parse_chat_ids(raw: &str) -> Result<Vec<ChatId>, std::num::ParseIntError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Chat ids are negative numbers and the bot token contains a
                    // colon; keep every value a string.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_ids() {
        assert_eq!(
            parse_chat_ids("-1001234, 42,,").unwrap(),
            vec![-1001234, 42]
        );
        assert!(parse_chat_ids("").unwrap().is_empty());
        assert!(parse_chat_ids("abc").is_err());
    }

    #[test]
    fn test_media_url_defaults_to_api_url() {
        let gallery = GalleryConfig {
            api_url: "https://gallery.example".into(),
            media_url: None,
            api_token: "t".into(),
            timeout: default_timeout(),
        };
        assert_eq!(gallery.media_url(), "https://gallery.example");
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        assert_eq!(server.socket_addr().unwrap().port(), 9000);
    }
}
